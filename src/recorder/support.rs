//! Validation of the configured service → characteristics map against the
//! services and characteristics the recorder can actually decode.

use std::collections::BTreeMap;

use crate::ble::{BleUuid, CharacteristicLabel, ServiceLabel};
use crate::error::ConfigError;

/// The services we can record data from.
pub const SUPPORTED_SERVICES: [ServiceLabel; 2] =
    [ServiceLabel::NoninOximetry, ServiceLabel::Battery];

/// The characteristics we can record data from.
///
/// The order of this array determines which characteristic is preferred
/// when choosing one to display live.
pub const SUPPORTED_CHARACTERISTICS: [CharacteristicLabel; 5] = [
    CharacteristicLabel::NoninContinuousOximetry,
    CharacteristicLabel::NoninPulseIntervalTime,
    CharacteristicLabel::NoninDeviceStatus,
    CharacteristicLabel::NoninPpg,
    CharacteristicLabel::BatteryLevel,
];

/// Verify that every configured service and characteristic is one the
/// recorder can decode. Each failure class is distinct so callers can tell
/// an empty configuration from an unsupported one.
pub fn recording_support(
    uuid_map: &BTreeMap<BleUuid, Vec<BleUuid>>,
) -> Result<(), ConfigError> {
    if uuid_map.is_empty() {
        return Err(ConfigError::EmptyConfiguration);
    }

    let empty_services: Vec<&BleUuid> = uuid_map
        .iter()
        .filter(|(_, characteristics)| characteristics.is_empty())
        .map(|(service, _)| service)
        .collect();
    if !empty_services.is_empty() {
        return Err(ConfigError::NoCharacteristicsConfigured(uuid_list(
            &empty_services,
        )));
    }

    let unsupported_services: Vec<&BleUuid> = uuid_map
        .keys()
        .filter(|uuid| match ServiceLabel::for_uuid(uuid) {
            Some(label) => !SUPPORTED_SERVICES.contains(&label),
            None => true,
        })
        .collect();
    if !unsupported_services.is_empty() {
        return Err(ConfigError::ServicesNotSupported(uuid_list(
            &unsupported_services,
        )));
    }

    let unsupported_characteristics: Vec<&BleUuid> = uuid_map
        .values()
        .flatten()
        .filter(|uuid| match CharacteristicLabel::for_uuid(uuid) {
            Some(label) => !SUPPORTED_CHARACTERISTICS.contains(&label),
            None => true,
        })
        .collect();
    if !unsupported_characteristics.is_empty() {
        return Err(ConfigError::CharacteristicsNotSupported(uuid_list(
            &unsupported_characteristics,
        )));
    }

    Ok(())
}

fn uuid_list(uuids: &[&BleUuid]) -> String {
    let ids = uuids
        .iter()
        .map(|uuid| format!("'{uuid}'"))
        .collect::<Vec<_>>()
        .join(" , ");
    format!("[ {ids} ]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &[&str])]) -> BTreeMap<BleUuid, Vec<BleUuid>> {
        entries
            .iter()
            .map(|(service, characteristics)| {
                (
                    BleUuid::new(service),
                    characteristics.iter().map(BleUuid::new).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_map_is_rejected() {
        assert_eq!(
            recording_support(&BTreeMap::new()),
            Err(ConfigError::EmptyConfiguration)
        );
    }

    #[test]
    fn service_without_characteristics_is_rejected() {
        let uuid_map = map(&[("180F", &[])]);
        assert!(matches!(
            recording_support(&uuid_map),
            Err(ConfigError::NoCharacteristicsConfigured(list)) if list.contains("180F")
        ));
    }

    #[test]
    fn unknown_and_unsupported_services_are_rejected() {
        let unknown = map(&[("FFF0", &["2A19"])]);
        assert!(matches!(
            recording_support(&unknown),
            Err(ConfigError::ServicesNotSupported(_))
        ));

        // Heart Rate is a known service the recorder cannot record from.
        let unsupported = map(&[("180D", &["2A37"])]);
        assert!(matches!(
            recording_support(&unsupported),
            Err(ConfigError::ServicesNotSupported(list)) if list.contains("180D")
        ));
    }

    #[test]
    fn unsupported_characteristics_are_rejected() {
        let uuid_map = map(&[(
            "46A970E0-0D5F-11E2-8B5E-0002A5D5C51B",
            &["1447AF80-0D60-11E2-88B6-0002A5D5C51B"],
        )]);
        assert!(matches!(
            recording_support(&uuid_map),
            Err(ConfigError::CharacteristicsNotSupported(_))
        ));
    }

    #[test]
    fn supported_configuration_passes() {
        let uuid_map = map(&[
            (
                "46A970E0-0D5F-11E2-8B5E-0002A5D5C51B",
                &[
                    "0AAD7EA0-0D60-11E2-8E3C-0002A5D5C51B",
                    "EC0A9302-4D24-11E7-B114-B2F933D5FE66",
                ],
            ),
            ("180F", &["2A19"]),
        ]);
        assert_eq!(recording_support(&uuid_map), Ok(()));
    }
}
