//! The recording pipeline: per-characteristic writers, the device
//! life-cycle orchestrator, configuration validation and settings
//! persistence.

pub mod manager;
pub mod settings;
pub mod state;
pub mod support;
pub mod writer;

pub use manager::RecordingManager;
pub use settings::{RecordingSettings, SettingsStorage};
pub use state::DeviceState;
pub use writer::NotificationsWriter;
