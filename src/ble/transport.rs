use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{ConnectError, RecordingError};

use super::BleUuid;

/// One notification payload delivered for a characteristic, paired with its
/// capture timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: u64,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(timestamp: u64, data: Vec<u8>) -> Self {
        Self { timestamp, data }
    }
}

/// The BLE transport boundary. Scanning, pairing and GATT plumbing live
/// behind this trait; the recorder only sees discovery primitives and one
/// frame stream per subscribed characteristic.
///
/// A notification stream terminates by closing its channel, either because
/// the subscription was stopped or because the underlying link failed.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Verify the transport is powered and the process is authorised to
    /// use it. Must be called before any connection attempt.
    async fn is_powered_on(&self) -> Result<(), ConnectError>;

    /// Find and connect to the named peripheral.
    async fn connect(&self, peripheral_id: &str) -> Result<(), ConnectError>;

    /// Discover the requested services on the connected peripheral.
    /// Returns the services actually present.
    async fn discover_services(&self, uuids: &[BleUuid]) -> Result<Vec<BleUuid>, ConnectError>;

    /// Discover the requested characteristics of one service. Returns the
    /// characteristics actually present.
    async fn discover_characteristics(
        &self,
        service: &BleUuid,
        uuids: &[BleUuid],
    ) -> Result<Vec<BleUuid>, ConnectError>;

    /// Subscribe to notifications for a discovered characteristic.
    async fn notifications(
        &self,
        characteristic: &BleUuid,
    ) -> Result<mpsc::Receiver<Frame>, RecordingError>;

    /// Unsubscribe from a characteristic's notifications. The matching
    /// stream channel closes afterwards.
    async fn stop_notifications(&self, characteristic: &BleUuid) -> Result<(), RecordingError>;

    /// Drop all subscriptions and disconnect from the peripheral.
    async fn disconnect(&self) -> Result<(), ConnectError>;
}
