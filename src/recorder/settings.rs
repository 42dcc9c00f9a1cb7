use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ble::BleUuid;

/// User-facing settings for one pulse-oximeter peripheral: which device to
/// connect to and which characteristics to record from, per service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSettings {
    /// The unique id of the configured peripheral.
    pub peripheral_id: Option<String>,
    /// The advertised name of the configured peripheral.
    pub peripheral_name: Option<String>,
    /// The string to search for when scanning for peripherals.
    #[serde(default)]
    pub peripheral_name_filter: String,
    /// Characteristics to record from, keyed by their service.
    #[serde(default)]
    pub characteristics: BTreeMap<BleUuid, Vec<BleUuid>>,
    #[serde(default = "default_recording_enabled")]
    pub recording_enabled: bool,
}

fn default_recording_enabled() -> bool {
    true
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            peripheral_id: None,
            peripheral_name: None,
            peripheral_name_filter: String::new(),
            characteristics: BTreeMap::new(),
            recording_enabled: true,
        }
    }
}

/// Manages persistence of recording settings to disk
pub struct SettingsStorage {
    storage_dir: PathBuf,
}

impl SettingsStorage {
    /// Create new storage manager
    ///
    /// Creates the storage directory if it doesn't exist
    pub fn new(storage_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&storage_dir)
            .context("Failed to create settings storage directory")?;

        Ok(Self { storage_dir })
    }

    /// Save settings to disk as pretty JSON
    pub fn save(&self, name: &str, settings: &RecordingSettings) -> Result<()> {
        let path = self.settings_path(name);
        let json = serde_json::to_string_pretty(settings)
            .context("Failed to serialize recording settings")?;

        fs::write(&path, json)
            .context(format!("Failed to write settings to {:?}", path))?;

        Ok(())
    }

    /// Load settings from disk
    pub fn load(&self, name: &str) -> Result<RecordingSettings> {
        let path = self.settings_path(name);
        let json = fs::read_to_string(&path)
            .context(format!("Failed to read settings from {:?}", path))?;

        let settings: RecordingSettings =
            serde_json::from_str(&json).context("Failed to deserialize recording settings")?;

        Ok(settings)
    }

    fn settings_path(&self, name: &str) -> PathBuf {
        self.storage_dir.join(format!("{}.json", name))
    }
}
