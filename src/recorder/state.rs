use serde::{Deserialize, Serialize};

/// Device life-cycle states, driven by [`RecordingManager`].
///
/// The nominal cycle is Disconnected → Connecting → Connected → Configuring
/// → Streaming → Stopping → Disconnecting → Disconnected. Transitional
/// states fall back to Disconnected when their step fails.
///
/// [`RecordingManager`]: super::RecordingManager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    Disconnected,
    Connecting,
    Connected,
    Configuring,
    Streaming,
    Stopping,
    Disconnecting,
}

impl DeviceState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &DeviceState) -> bool {
        use DeviceState::*;

        matches!(
            (self, target),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Configuring)
                | (Connected, Disconnecting)
                | (Configuring, Streaming)
                | (Configuring, Stopping)
                | (Configuring, Disconnecting)
                | (Configuring, Disconnected)
                | (Streaming, Stopping)
                | (Streaming, Disconnecting)
                | (Stopping, Disconnecting)
                | (Stopping, Disconnected)
                | (Disconnecting, Disconnected)
        )
    }

    /// Get human-readable state name
    pub fn name(&self) -> &str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Configuring => "Configuring",
            Self::Streaming => "Streaming",
            Self::Stopping => "Stopping",
            Self::Disconnecting => "Disconnecting",
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::Disconnected
    }
}
