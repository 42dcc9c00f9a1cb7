//! An in-process transport for tests and demos. Services, characteristics
//! and notification frames are scripted up front; the recorder drives it
//! through the same [`Transport`] trait a real BLE stack would sit behind.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{ConnectError, RecordingError};

use super::transport::{Frame, Transport};
use super::BleUuid;

const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct MockState {
    powered: bool,
    authorized: bool,
    connected: bool,
    /// Peripheral id the mock advertises. `None` accepts any id.
    advertised: Option<String>,
    services: HashMap<BleUuid, Vec<BleUuid>>,
    scripts: HashMap<BleUuid, Vec<Frame>>,
    failing_subscriptions: HashSet<BleUuid>,
    subscriptions: HashMap<BleUuid, mpsc::Sender<Frame>>,
}

pub struct MockTransport {
    state: Mutex<MockState>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// A powered-on, authorized transport with no services configured.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                powered: true,
                authorized: true,
                ..MockState::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn set_powered(&self, powered: bool) {
        self.lock().powered = powered;
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.lock().authorized = authorized;
    }

    /// Restrict `connect` to one peripheral id.
    pub fn advertise(&self, peripheral_id: impl Into<String>) {
        self.lock().advertised = Some(peripheral_id.into());
    }

    /// Register a service and the characteristics it exposes.
    pub fn add_service(&self, service: BleUuid, characteristics: Vec<BleUuid>) {
        self.lock().services.insert(service, characteristics);
    }

    /// Queue frames to deliver once the characteristic is subscribed.
    pub fn script_frames(&self, characteristic: BleUuid, frames: Vec<Frame>) {
        self.lock().scripts.insert(characteristic, frames);
    }

    /// Make the next subscription attempt for this characteristic fail.
    pub fn fail_subscription(&self, characteristic: BleUuid) {
        self.lock().failing_subscriptions.insert(characteristic);
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    pub fn is_subscribed(&self, characteristic: &BleUuid) -> bool {
        self.lock().subscriptions.contains_key(characteristic)
    }

    pub fn subscription_count(&self) -> usize {
        self.lock().subscriptions.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn is_powered_on(&self) -> Result<(), ConnectError> {
        let state = self.lock();
        if !state.authorized {
            return Err(ConnectError::NotAuthorized);
        }
        if !state.powered {
            return Err(ConnectError::InputDeviceUnavailable(
                "adapter is powered off".to_string(),
            ));
        }
        Ok(())
    }

    async fn connect(&self, peripheral_id: &str) -> Result<(), ConnectError> {
        let mut state = self.lock();
        if let Some(advertised) = &state.advertised {
            if advertised != peripheral_id {
                return Err(ConnectError::FailedToConnect(format!(
                    "peripheral {peripheral_id} not found"
                )));
            }
        }
        state.connected = true;
        Ok(())
    }

    async fn discover_services(&self, uuids: &[BleUuid]) -> Result<Vec<BleUuid>, ConnectError> {
        let state = self.lock();
        if !state.connected {
            return Err(ConnectError::FailedToConnect("not connected".to_string()));
        }
        Ok(uuids
            .iter()
            .filter(|uuid| state.services.contains_key(uuid))
            .cloned()
            .collect())
    }

    async fn discover_characteristics(
        &self,
        service: &BleUuid,
        uuids: &[BleUuid],
    ) -> Result<Vec<BleUuid>, ConnectError> {
        let state = self.lock();
        if !state.connected {
            return Err(ConnectError::FailedToConnect("not connected".to_string()));
        }
        let present = state.services.get(service).ok_or_else(|| {
            ConnectError::FailedToConnect(format!("service {service} not discovered"))
        })?;
        Ok(uuids
            .iter()
            .filter(|uuid| present.contains(uuid))
            .cloned()
            .collect())
    }

    async fn notifications(
        &self,
        characteristic: &BleUuid,
    ) -> Result<mpsc::Receiver<Frame>, RecordingError> {
        let (sender, receiver) = mpsc::channel(NOTIFICATION_CHANNEL_CAPACITY);
        let frames = {
            let mut state = self.lock();
            if state.failing_subscriptions.remove(characteristic) {
                return Err(RecordingError::FailedToStart(format!(
                    "subscription refused for {characteristic}"
                )));
            }
            state
                .subscriptions
                .insert(characteristic.clone(), sender.clone());
            state.scripts.remove(characteristic).unwrap_or_default()
        };
        // The stored sender keeps the channel open after the script drains,
        // until stop_notifications or disconnect drops it.
        tokio::spawn(async move {
            for frame in frames {
                if sender.send(frame).await.is_err() {
                    break;
                }
            }
        });
        Ok(receiver)
    }

    async fn stop_notifications(&self, characteristic: &BleUuid) -> Result<(), RecordingError> {
        self.lock().subscriptions.remove(characteristic);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ConnectError> {
        let mut state = self.lock();
        state.subscriptions.clear();
        state.connected = false;
        Ok(())
    }
}
