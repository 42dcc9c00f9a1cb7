//! Classification of the BLE services and characteristics the recorder
//! knows about, and the global UUID↔label tables used to pick decoders.
//!
//! The tables are immutable process-wide data: initialized once on first
//! use and safe for unsynchronized concurrent reads.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::BleUuid;

/// The services the recorder can classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLabel {
    DeviceInformation,
    HeartRate,
    Battery,
    PulseOximeter,
    NoninOximetry,
}

impl ServiceLabel {
    pub fn description(&self) -> &'static str {
        match self {
            Self::DeviceInformation => "Device Information",
            Self::HeartRate => "Heart Rate",
            Self::Battery => "Battery",
            Self::PulseOximeter => "Pulse Oximeter",
            Self::NoninOximetry => "Nonin Oximetry",
        }
    }

    /// The label for a given service UUID, if it is a known one.
    pub fn for_uuid(uuid: &BleUuid) -> Option<ServiceLabel> {
        SERVICE_TABLE.by_uuid.get(uuid).copied()
    }

    /// The UUID registered for this label.
    pub fn uuid(&self) -> BleUuid {
        SERVICE_TABLE.by_label[self].clone()
    }
}

/// The characteristics the recorder can classify. Only a subset of these
/// has a frame decoder; the rest exist so discovery results can be named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacteristicLabel {
    BatteryLevel,
    SystemId,
    ModelNumber,
    SerialNumber,
    FirmwareRevision,
    HardwareRevision,
    SoftwareRevision,
    ManufacturerName,
    Ieee11073_20601,
    HeartRate,
    PlxContinuousMeasurement,
    PlxFeatures,
    NoninContinuousOximetry,
    NoninPulseIntervalTime,
    NoninControlPoint,
    NoninPpg,
    NoninMemoryPlayback,
    NoninDeviceStatus,
}

impl CharacteristicLabel {
    pub fn description(&self) -> &'static str {
        match self {
            Self::BatteryLevel => "Battery Level",
            Self::SystemId => "System ID",
            Self::ModelNumber => "Model Number String",
            Self::SerialNumber => "Serial Number String",
            Self::FirmwareRevision => "Firmware Revision String",
            Self::HardwareRevision => "Hardware Revision String",
            Self::SoftwareRevision => "Software Revision String",
            Self::ManufacturerName => "Manufacturer Name String",
            Self::Ieee11073_20601 => "IEEE 11073-20601 Regulatory Certification Data List",
            Self::HeartRate => "Heart Rate Measurement",
            Self::PlxContinuousMeasurement => "PLX Continuous Measurement",
            Self::PlxFeatures => "PLX Features",
            Self::NoninContinuousOximetry => "Nonin Continuous Oximetry",
            Self::NoninPulseIntervalTime => "Nonin Pulse Interval Time",
            Self::NoninControlPoint => "Nonin Control Point",
            Self::NoninPpg => "Nonin PPG",
            Self::NoninMemoryPlayback => "Nonin Memory Playback",
            Self::NoninDeviceStatus => "Nonin Device Status",
        }
    }

    /// Stem used for the per-characteristic output file names
    /// (`ble_spec-<stem>.csv`).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::BatteryLevel => "battery_level",
            Self::SystemId => "system_id",
            Self::ModelNumber => "model_number_string",
            Self::SerialNumber => "serial_number_string",
            Self::FirmwareRevision => "firmware_revision_string",
            Self::HardwareRevision => "hardware_revision_string",
            Self::SoftwareRevision => "software_revision_string",
            Self::ManufacturerName => "manufacturer_name_string",
            Self::Ieee11073_20601 => "ieee_11073_20601",
            Self::HeartRate => "heart_rate",
            Self::PlxContinuousMeasurement => "PLX_continuous_measurement",
            Self::PlxFeatures => "PLX_features",
            Self::NoninContinuousOximetry => "nonin_continuous_oximetry",
            Self::NoninPulseIntervalTime => "nonin_pulse_interval_time",
            Self::NoninControlPoint => "nonin_control_point",
            Self::NoninPpg => "nonin_PPG",
            Self::NoninMemoryPlayback => "nonin_memory_playback",
            Self::NoninDeviceStatus => "nonin_device_status",
        }
    }

    /// The label for a given characteristic UUID, if it is a known one.
    pub fn for_uuid(uuid: &BleUuid) -> Option<CharacteristicLabel> {
        CHARACTERISTIC_TABLE.by_uuid.get(uuid).copied()
    }

    /// The UUID registered for this label.
    pub fn uuid(&self) -> BleUuid {
        CHARACTERISTIC_TABLE.by_label[self].clone()
    }
}

struct LabelTable<L> {
    by_uuid: HashMap<BleUuid, L>,
    by_label: HashMap<L, BleUuid>,
}

impl<L: Copy + Eq + std::hash::Hash> LabelTable<L> {
    fn new(entries: &[(&str, L)]) -> Self {
        let by_uuid: HashMap<BleUuid, L> = entries
            .iter()
            .map(|(uuid, label)| (BleUuid::new(uuid), *label))
            .collect();
        let by_label = by_uuid
            .iter()
            .map(|(uuid, label)| (*label, uuid.clone()))
            .collect();
        Self { by_uuid, by_label }
    }
}

static SERVICE_TABLE: Lazy<LabelTable<ServiceLabel>> = Lazy::new(|| {
    LabelTable::new(&[
        ("180A", ServiceLabel::DeviceInformation),
        ("180D", ServiceLabel::HeartRate),
        ("180F", ServiceLabel::Battery),
        ("1822", ServiceLabel::PulseOximeter),
        ("46A970E0-0D5F-11E2-8B5E-0002A5D5C51B", ServiceLabel::NoninOximetry),
    ])
});

static CHARACTERISTIC_TABLE: Lazy<LabelTable<CharacteristicLabel>> = Lazy::new(|| {
    LabelTable::new(&[
        ("2A19", CharacteristicLabel::BatteryLevel),
        ("2A23", CharacteristicLabel::SystemId),
        ("2A24", CharacteristicLabel::ModelNumber),
        ("2A25", CharacteristicLabel::SerialNumber),
        ("2A26", CharacteristicLabel::FirmwareRevision),
        ("2A27", CharacteristicLabel::HardwareRevision),
        ("2A28", CharacteristicLabel::SoftwareRevision),
        ("2A29", CharacteristicLabel::ManufacturerName),
        ("2A2A", CharacteristicLabel::Ieee11073_20601),
        ("2A37", CharacteristicLabel::HeartRate),
        ("2A5F", CharacteristicLabel::PlxContinuousMeasurement),
        ("2A60", CharacteristicLabel::PlxFeatures),
        (
            "0AAD7EA0-0D60-11E2-8E3C-0002A5D5C51B",
            CharacteristicLabel::NoninContinuousOximetry,
        ),
        (
            "34E27863-76FF-4F8E-96F1-9E3993AA6199",
            CharacteristicLabel::NoninPulseIntervalTime,
        ),
        (
            "1447AF80-0D60-11E2-88B6-0002A5D5C51B",
            CharacteristicLabel::NoninControlPoint,
        ),
        (
            "EC0A883A-4D24-11E7-B114-B2F933D5FE66",
            CharacteristicLabel::NoninPpg,
        ),
        (
            "EC0A8DDA-4D24-11E7-B114-B2F933D5FE66",
            CharacteristicLabel::NoninMemoryPlayback,
        ),
        (
            "EC0A9302-4D24-11E7-B114-B2F933D5FE66",
            CharacteristicLabel::NoninDeviceStatus,
        ),
    ])
});
