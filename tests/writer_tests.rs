//! Recording writer behaviour over the mock transport: file creation
//! rules, idempotent start/stop, ordered rows and decode-failure tolerance.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;

use oxirec::ble::{CharacteristicLabel, Frame, MockTransport};
use oxirec::decode::Decoder;
use oxirec::error::ConnectError;
use oxirec::recorder::NotificationsWriter;
use oxirec::signal::SignalType;

fn bas_writer(
    transport: &Arc<MockTransport>,
    path: &std::path::Path,
    publishing: bool,
) -> NotificationsWriter {
    NotificationsWriter::new(
        transport.clone(),
        Decoder::Bas,
        true,
        path.to_path_buf(),
        publishing,
    )
}

#[tokio::test]
async fn configure_creates_header_and_info_files() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let mut writer = bas_writer(&transport, dir.path(), false);

    writer.configure().unwrap();

    let data = fs::read_to_string(dir.path().join("ble_spec-battery_level.csv")).unwrap();
    assert_eq!(data, "Timestamp,Bat perc\n");

    let info = fs::read_to_string(dir.path().join("ble_spec-battery_level-info.csv")).unwrap();
    assert!(info.starts_with("name , description, units, gain, frequency\n"));
    assert!(info.contains("Bat perc"));
}

#[tokio::test]
async fn configure_never_overwrites_an_existing_file() {
    let dir = tempdir().unwrap();
    let existing = dir.path().join("ble_spec-battery_level.csv");
    fs::write(&existing, "precious data\n").unwrap();

    let transport = Arc::new(MockTransport::new());
    let mut writer = bas_writer(&transport, dir.path(), false);

    match writer.configure() {
        Err(ConnectError::OutputFileExists { path }) => assert_eq!(path, existing),
        other => panic!("expected OutputFileExists, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&existing).unwrap(), "precious data\n");
}

#[tokio::test]
async fn frames_are_written_in_arrival_order() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let characteristic = CharacteristicLabel::BatteryLevel.uuid();
    transport.script_frames(
        characteristic.clone(),
        vec![
            Frame::new(1, vec![90]),
            Frame::new(2, vec![89]),
            Frame::new(3, vec![88]),
        ],
    );

    let mut writer = bas_writer(&transport, dir.path(), false);
    writer.configure().unwrap();
    writer.start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    writer.stop().await.unwrap();

    let data = fs::read_to_string(dir.path().join("ble_spec-battery_level.csv")).unwrap();
    assert_eq!(data, "Timestamp,Bat perc\n1,90\n2,89\n3,88\n");
    assert!(!transport.is_subscribed(&characteristic));
}

#[tokio::test]
async fn a_frame_that_fails_to_decode_does_not_break_the_stream() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let characteristic = CharacteristicLabel::NoninDeviceStatus.uuid();
    transport.script_frames(
        characteristic.clone(),
        vec![
            Frame::new(1, vec![7, 0x01, 0x00, 36, 80, 0x00, 0x01]),
            // Lies about its own length.
            Frame::new(2, vec![99, 0x01]),
            Frame::new(3, vec![7, 0x01, 0x00, 36, 79, 0x00, 0x02]),
        ],
    );

    let mut writer = NotificationsWriter::new(
        transport.clone(),
        Decoder::Nds,
        true,
        dir.path().to_path_buf(),
        false,
    );
    writer.configure().unwrap();
    writer.start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    writer.stop().await.unwrap();

    let data = fs::read_to_string(dir.path().join("ble_spec-nonin_device_status.csv")).unwrap();
    let lines: Vec<&str> = data.lines().collect();
    assert_eq!(lines.len(), 3); // header + the two valid frames
    assert!(lines[1].starts_with("1,1,36,80"));
    assert!(lines[2].starts_with("3,2,36,79"));
}

#[tokio::test]
async fn start_is_idempotent() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let characteristic = CharacteristicLabel::BatteryLevel.uuid();

    let mut writer = bas_writer(&transport, dir.path(), false);
    writer.configure().unwrap();

    writer.start().await.unwrap();
    writer.start().await.unwrap();
    assert!(writer.is_recording());
    // The second start did not open a second subscription.
    assert_eq!(transport.subscription_count(), 1);
    assert!(transport.is_subscribed(&characteristic));

    writer.stop().await.unwrap();
}

#[tokio::test]
async fn stop_before_start_is_a_no_op() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let mut writer = bas_writer(&transport, dir.path(), false);

    writer.stop().await.unwrap();
    writer.stop().await.unwrap();
    assert!(!writer.is_recording());
}

#[tokio::test]
async fn published_samples_reach_subscribers() {
    let dir = tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let characteristic = CharacteristicLabel::BatteryLevel.uuid();
    transport.script_frames(characteristic.clone(), vec![Frame::new(4, vec![66])]);

    let mut writer = bas_writer(&transport, dir.path(), true);
    writer.configure().unwrap();

    let mut subscription = writer.subscribe();
    // Primed with the empty sample before any frame arrives.
    assert_eq!(
        subscription.borrow().value(SignalType::BatteryPercentage),
        Some(0)
    );

    writer.start().await.unwrap();
    subscription.changed().await.unwrap();
    let sample = subscription.borrow().clone();
    assert_eq!(sample.timestamp(), 4);
    assert_eq!(sample.value(SignalType::BatteryPercentage), Some(66));

    writer.stop().await.unwrap();
}
