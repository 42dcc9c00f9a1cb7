use std::fmt;

use serde::{Deserialize, Serialize};

/// A Bluetooth UUID in its textual form, either the 16-bit short code
/// ("2A37") or the full 128-bit form. Stored uppercase so lookups and map
/// keys are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BleUuid(String);

impl BleUuid {
    pub fn new(uuid: impl AsRef<str>) -> Self {
        Self(uuid.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BleUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BleUuid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BleUuid {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
