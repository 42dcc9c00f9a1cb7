//! Orchestrator life cycle over the mock transport: configuration
//! validation, the end-to-end happy path and the partial-start contract.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;

use oxirec::ble::{BleUuid, CharacteristicLabel, Frame, MockTransport, ServiceLabel};
use oxirec::error::{ConnectError, RecordingError};
use oxirec::recorder::{DeviceState, RecordingManager, RecordingSettings};

fn oximetry_settings(characteristics: Vec<BleUuid>) -> RecordingSettings {
    let mut settings = RecordingSettings {
        peripheral_id: Some("oximeter-1".to_string()),
        ..RecordingSettings::default()
    };
    settings
        .characteristics
        .insert(ServiceLabel::NoninOximetry.uuid(), characteristics);
    settings
}

fn oximetry_transport(characteristics: &[BleUuid]) -> Arc<MockTransport> {
    let transport = Arc::new(MockTransport::new());
    transport.advertise("oximeter-1");
    transport.add_service(ServiceLabel::NoninOximetry.uuid(), characteristics.to_vec());
    transport
}

#[tokio::test]
async fn empty_configuration_fails_the_connect() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let settings = RecordingSettings {
        peripheral_id: Some("oximeter-1".to_string()),
        characteristics: BTreeMap::new(),
        ..RecordingSettings::default()
    };

    let mut manager = RecordingManager::new(transport, settings, dir.path().to_path_buf());
    assert!(matches!(
        manager.connect().await,
        Err(ConnectError::EmptyConfiguration)
    ));
    assert_eq!(manager.state(), DeviceState::Disconnected);
}

#[tokio::test]
async fn unsupported_characteristic_fails_the_connect() {
    let dir = tempdir().unwrap();
    let control_point = CharacteristicLabel::NoninControlPoint.uuid();
    let transport = oximetry_transport(&[control_point.clone()]);
    let settings = oximetry_settings(vec![control_point]);

    let mut manager = RecordingManager::new(transport, settings, dir.path().to_path_buf());
    assert!(matches!(
        manager.connect().await,
        Err(ConnectError::UnsupportedConfiguration(_))
    ));
    assert_eq!(manager.state(), DeviceState::Disconnected);
}

#[tokio::test]
async fn end_to_end_recording_over_the_mock_transport() {
    let dir = tempdir().unwrap();
    let nco = CharacteristicLabel::NoninContinuousOximetry.uuid();
    let nds = CharacteristicLabel::NoninDeviceStatus.uuid();

    let transport = oximetry_transport(&[nco.clone(), nds.clone()]);
    transport.script_frames(
        nco.clone(),
        vec![
            Frame::new(1, vec![10, 0x14, 100, 0x00, 0x32, 0x00, 0x01, 98, 0x00, 0x4B]),
            Frame::new(2, vec![10, 0x14, 100, 0x00, 0x33, 0x00, 0x02, 97, 0x00, 0x4C]),
        ],
    );
    transport.script_frames(
        nds.clone(),
        vec![Frame::new(3, vec![7, 0x01, 0x00, 36, 80, 0x00, 0x01])],
    );

    let settings = oximetry_settings(vec![nco.clone(), nds.clone()]);
    let mut manager =
        RecordingManager::new(transport.clone(), settings, dir.path().to_path_buf());

    manager.check_access().await.unwrap();
    manager.connect().await.unwrap();
    assert_eq!(manager.state(), DeviceState::Configuring);
    assert_eq!(manager.writer_count(), 2);
    // Both default display characteristics are configured.
    assert_eq!(manager.display_subscriptions().len(), 2);

    manager.start_recording().await.unwrap();
    assert_eq!(manager.state(), DeviceState::Streaming);

    tokio::time::sleep(Duration::from_millis(200)).await;
    manager.stop_recording().await.unwrap();
    manager.disconnect().await.unwrap();
    assert_eq!(manager.state(), DeviceState::Disconnected);
    assert!(!transport.is_connected());
    assert_eq!(transport.subscription_count(), 0);

    let nco_csv =
        fs::read_to_string(dir.path().join("ble_spec-nonin_continuous_oximetry.csv")).unwrap();
    let lines: Vec<&str> = nco_csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Timestamp,Counter"));
    assert!(lines[1].starts_with("1,1,100,50,98,75"));
    assert!(lines[2].starts_with("2,2,100,51,97,76"));

    let nds_csv =
        fs::read_to_string(dir.path().join("ble_spec-nonin_device_status.csv")).unwrap();
    assert_eq!(nds_csv.lines().count(), 2);

    // Info companions were written for both characteristics.
    assert!(dir
        .path()
        .join("ble_spec-nonin_continuous_oximetry-info.csv")
        .exists());
    assert!(dir.path().join("ble_spec-nonin_device_status-info.csv").exists());
}

#[tokio::test]
async fn partial_start_is_reported_as_a_failure() {
    let dir = tempdir().unwrap();
    let nco = CharacteristicLabel::NoninContinuousOximetry.uuid();
    let nds = CharacteristicLabel::NoninDeviceStatus.uuid();

    let transport = oximetry_transport(&[nco.clone(), nds.clone()]);
    transport.fail_subscription(nds.clone());

    let settings = oximetry_settings(vec![nco.clone(), nds.clone()]);
    let mut manager =
        RecordingManager::new(transport.clone(), settings, dir.path().to_path_buf());

    manager.connect().await.unwrap();
    match manager.start_recording().await {
        Err(RecordingError::FailedToStartFromAllDevices { started, total }) => {
            assert_eq!(started, 1);
            assert_eq!(total, 2);
        }
        other => panic!("expected partial-start failure, got {other:?}"),
    }

    // The surviving writer is independently observable and still running.
    assert!(transport.is_subscribed(&nco));
    assert!(!transport.is_subscribed(&nds));

    // The caller cleans up explicitly after a partial start.
    manager.stop_recording().await.unwrap();
    assert_eq!(transport.subscription_count(), 0);
    manager.disconnect().await.unwrap();
}

#[tokio::test]
async fn powered_off_transport_fails_the_access_check() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.set_powered(false);

    let manager = RecordingManager::new(
        transport,
        oximetry_settings(vec![CharacteristicLabel::NoninContinuousOximetry.uuid()]),
        dir.path().to_path_buf(),
    );
    assert!(matches!(
        manager.check_access().await,
        Err(ConnectError::InputDeviceUnavailable(_))
    ));
}

#[tokio::test]
async fn display_preference_falls_back_to_the_supported_order() {
    let dir = tempdir().unwrap();
    let npit = CharacteristicLabel::NoninPulseIntervalTime.uuid();
    let nppg = CharacteristicLabel::NoninPpg.uuid();

    let transport = oximetry_transport(&[npit.clone(), nppg.clone()]);
    let settings = oximetry_settings(vec![npit, nppg]);
    let mut manager = RecordingManager::new(transport, settings, dir.path().to_path_buf());

    manager.connect().await.unwrap();
    let subscriptions = manager.display_subscriptions();
    // Neither default display characteristic is configured, so the first
    // in the supported order wins.
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(
        subscriptions[0].0,
        CharacteristicLabel::NoninPulseIntervalTime
    );
    manager.disconnect().await.unwrap();
}
