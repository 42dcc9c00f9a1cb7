//! The device life-cycle orchestrator: validates the configured
//! characteristics, connects and discovers, builds one writer per resolved
//! characteristic and starts/stops them as a group.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;

use crate::ble::{BleUuid, CharacteristicLabel, Transport};
use crate::decode::{DecodedSample, Decoder};
use crate::error::{ConnectError, RecordingError};

use super::settings::RecordingSettings;
use super::state::DeviceState;
use super::support::{recording_support, SUPPORTED_CHARACTERISTICS};
use super::writer::NotificationsWriter;

/// Characteristics whose samples are preferred for live display when the
/// user configured them.
const DEFAULT_DISPLAY_LABELS: [CharacteristicLabel; 2] = [
    CharacteristicLabel::NoninContinuousOximetry,
    CharacteristicLabel::NoninDeviceStatus,
];

pub struct RecordingManager {
    transport: Arc<dyn Transport>,
    settings: RecordingSettings,
    recording_path: PathBuf,
    state: DeviceState,
    writers: HashMap<CharacteristicLabel, NotificationsWriter>,
}

impl RecordingManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: RecordingSettings,
        recording_path: PathBuf,
    ) -> Self {
        Self {
            transport,
            settings,
            recording_path,
            state: DeviceState::Disconnected,
            writers: HashMap::new(),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn writer_count(&self) -> usize {
        self.writers.len()
    }

    /// Latest-sample subscriptions for the writers selected for display.
    pub fn display_subscriptions(
        &self,
    ) -> Vec<(CharacteristicLabel, watch::Receiver<DecodedSample>)> {
        let mut entries: Vec<(CharacteristicLabel, &NotificationsWriter)> = self
            .writers
            .iter()
            .filter(|(_, writer)| writer.publishing_enabled())
            .map(|(label, writer)| (*label, writer))
            .collect();
        entries.sort_by_key(|(label, _)| label.description());
        entries
            .into_iter()
            .map(|(label, writer)| (label, writer.subscribe()))
            .collect()
    }

    /// Verify the transport is powered and authorized before any
    /// connection attempt.
    pub async fn check_access(&self) -> Result<(), ConnectError> {
        self.transport.is_powered_on().await
    }

    /// Validate the configuration, connect to the peripheral, discover the
    /// configured services and characteristics, and build one configured
    /// writer per resolved characteristic. Any failure tears back down to
    /// the disconnected state.
    pub async fn connect(&mut self) -> Result<(), ConnectError> {
        self.advance(DeviceState::Connecting);
        match self.connect_inner().await {
            Ok(()) => Ok(()),
            Err(error) => {
                self.writers.clear();
                if let Err(disconnect_error) = self.transport.disconnect().await {
                    log::warn!("cleanup disconnect failed: {disconnect_error}");
                }
                self.state = DeviceState::Disconnected;
                Err(error)
            }
        }
    }

    async fn connect_inner(&mut self) -> Result<(), ConnectError> {
        recording_support(&self.settings.characteristics)?;

        let peripheral_id = self.settings.peripheral_id.clone().ok_or_else(|| {
            ConnectError::UnsupportedConfiguration("no BLE peripheral configured".to_string())
        })?;

        self.transport.connect(&peripheral_id).await?;
        self.advance(DeviceState::Connected);

        let service_uuids: Vec<BleUuid> =
            self.settings.characteristics.keys().cloned().collect();
        self.transport.discover_services(&service_uuids).await?;

        let mut resolved: Vec<CharacteristicLabel> = Vec::new();
        for (service, characteristics) in &self.settings.characteristics {
            let discovered = self
                .transport
                .discover_characteristics(service, characteristics)
                .await?;
            // Validation guaranteed every configured uuid has a label.
            resolved.extend(
                discovered
                    .iter()
                    .filter_map(CharacteristicLabel::for_uuid),
            );
        }

        self.advance(DeviceState::Configuring);
        self.build_writers(&resolved)?;
        Ok(())
    }

    fn build_writers(&mut self, resolved: &[CharacteristicLabel]) -> Result<(), ConnectError> {
        self.writers.clear();

        let display_labels = Self::labels_to_display(resolved);

        for label in resolved {
            let decoder = Decoder::for_label(*label).ok_or_else(|| {
                ConnectError::UnsupportedConfiguration(format!(
                    "could not find decoder for characteristic '{}'",
                    label.description()
                ))
            })?;

            let mut writer = NotificationsWriter::new(
                Arc::clone(&self.transport),
                decoder,
                self.settings.recording_enabled,
                self.recording_path.clone(),
                display_labels.contains(label),
            );
            writer.configure()?;
            self.writers.insert(*label, writer);
        }

        if self.writers.is_empty() {
            return Err(ConnectError::UnsupportedConfiguration(
                "no supported BLE data writers available".to_string(),
            ));
        }
        Ok(())
    }

    /// The characteristics whose samples feed the live display: the default
    /// pair when configured, otherwise the first configured characteristic
    /// in the supported order.
    fn labels_to_display(resolved: &[CharacteristicLabel]) -> Vec<CharacteristicLabel> {
        let mut labels: Vec<CharacteristicLabel> = DEFAULT_DISPLAY_LABELS
            .into_iter()
            .filter(|label| resolved.contains(label))
            .collect();

        if labels.is_empty() {
            if let Some(label) = SUPPORTED_CHARACTERISTICS
                .into_iter()
                .find(|label| resolved.contains(label))
            {
                labels.push(label);
            }
        }
        labels
    }

    /// Start every writer concurrently. The call succeeds only when all of
    /// them start; on a partial start the already-running writers keep
    /// running and the caller must stop and clean up explicitly.
    pub async fn start_recording(&mut self) -> Result<(), RecordingError> {
        let total = self.writers.len();

        let outcomes = join_all(self.writers.iter_mut().map(|(label, writer)| async move {
            (*label, writer.start().await)
        }))
        .await;

        let mut started = 0;
        for (label, outcome) in outcomes {
            match outcome {
                Ok(()) => started += 1,
                Err(error) => log::error!(
                    "failed to start writer for characteristic '{}': {error}",
                    label.description()
                ),
            }
        }

        if started < total {
            return Err(RecordingError::FailedToStartFromAllDevices { started, total });
        }

        self.advance(DeviceState::Streaming);
        Ok(())
    }

    /// Stop every writer. Individual failures never abort the loop; the
    /// last error seen is reported once every writer has been attempted.
    pub async fn stop_recording(&mut self) -> Result<(), RecordingError> {
        self.advance(DeviceState::Stopping);

        let mut stop_error = None;
        for (label, writer) in self.writers.iter_mut() {
            if let Err(error) = writer.stop().await {
                log::error!(
                    "failed to stop writer for characteristic '{}': {error}",
                    label.description()
                );
                stop_error = Some(error);
            }
        }

        match stop_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Stop and drop every writer, drop display subscriptions and
    /// disconnect from the peripheral.
    pub async fn disconnect(&mut self) -> Result<(), ConnectError> {
        self.advance(DeviceState::Disconnecting);

        for writer in self.writers.values_mut() {
            if let Err(error) = writer.stop().await {
                log::warn!("writer did not stop during disconnect: {error}");
            }
        }
        self.writers.clear();

        let result = self
            .transport
            .disconnect()
            .await
            .map_err(|error| ConnectError::FailedToDisconnect(error.to_string()));

        self.advance(DeviceState::Disconnected);
        result
    }

    fn advance(&mut self, next: DeviceState) {
        if !self.state.can_transition_to(&next) {
            log::warn!(
                "unexpected state transition {} -> {}",
                self.state.name(),
                next.name()
            );
        }
        log::info!("device state: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}
