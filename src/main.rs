use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use oxirec::ble::{CharacteristicLabel, Frame, MockTransport, ServiceLabel};
use oxirec::recorder::{RecordingManager, RecordingSettings};
use oxirec::signal::SignalType;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("oxirec - pulse oximeter recording demo");
    println!("======================================\n");

    // A simulated peripheral exposing the Nonin oximetry service with the
    // continuous-oximetry and device-status characteristics.
    let nco = CharacteristicLabel::NoninContinuousOximetry.uuid();
    let nds = CharacteristicLabel::NoninDeviceStatus.uuid();
    let service = ServiceLabel::NoninOximetry.uuid();

    let transport = Arc::new(MockTransport::new());
    transport.advertise("demo-oximeter");
    transport.add_service(service.clone(), vec![nco.clone(), nds.clone()]);
    transport.script_frames(nco.clone(), nco_frames());
    transport.script_frames(nds.clone(), nds_frames());

    let mut settings = RecordingSettings {
        peripheral_id: Some("demo-oximeter".to_string()),
        peripheral_name: Some("Demo Oximeter".to_string()),
        ..RecordingSettings::default()
    };
    settings.characteristics.insert(service, vec![nco, nds]);

    let recording_path = std::env::temp_dir().join(format!("oxirec-demo-{}", now_nanos()));
    std::fs::create_dir_all(&recording_path)?;
    println!("Recording to {}\n", recording_path.display());

    let mut manager = RecordingManager::new(transport, settings, recording_path.clone());

    manager.check_access().await?;
    manager.connect().await?;
    println!("Connected, {} writers configured", manager.writer_count());

    let subscriptions = manager.display_subscriptions();
    manager.start_recording().await?;
    println!("Recording started ({:?})\n", manager.state());

    // Give the scripted frames time to flow through the writers.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    for (label, receiver) in &subscriptions {
        let sample = receiver.borrow();
        println!(
            "{}: SpO2 = {:?}, HR = {:?}, battery = {:?}%",
            label.description(),
            sample.value(SignalType::SpO2),
            sample.value(SignalType::Hr),
            sample.value(SignalType::BatteryPercentage),
        );
    }

    manager.stop_recording().await?;
    manager.disconnect().await?;
    println!("\nDisconnected ({:?})", manager.state());

    for entry in std::fs::read_dir(&recording_path)? {
        let path = entry?.path();
        let size = std::fs::metadata(&path)?.len();
        println!("  {} ({size} bytes)", path.display());
    }

    Ok(())
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

/// A short burst of continuous-oximetry frames with a rising counter.
fn nco_frames() -> Vec<Frame> {
    (0u8..5)
        .map(|index| {
            Frame::new(
                now_nanos() + index as u64,
                vec![10, 0x14, 100, 0x00, 0x32, 0x00, index, 97 + (index % 3), 0x00, 72 + index],
            )
        })
        .collect()
}

/// Device-status frames: sensor fitted, battery draining.
fn nds_frames() -> Vec<Frame> {
    (0u8..3)
        .map(|index| {
            Frame::new(
                now_nanos() + index as u64,
                vec![7, 0x01, 0x00, 36, 80 - index, 0x00, index],
            )
        })
        .collect()
}
