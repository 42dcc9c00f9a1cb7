//! Error taxonomy for the recording pipeline.
//!
//! Three tiers with different blast radii:
//!
//! - [`DecodeError`] is per-frame. The writer logs it, drops the frame and
//!   keeps consuming the stream.
//! - [`ConnectError`] aborts a connect/configure attempt; the manager falls
//!   back to the disconnected state.
//! - [`RecordingError`] aborts a start/stop call; the manager still attempts
//!   cleanup for every writer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single notification frame could not be decoded. Never fatal to the
/// stream: the frame is dropped and the consumption loop continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame too small: expected at least {expected} bytes, got {actual}")]
    FrameTooSmall { expected: usize, actual: usize },

    #[error("declared frame length {declared} does not match the {actual} bytes received")]
    MalformedLength { declared: usize, actual: usize },

    #[error("{count} {kind} sub-records received, the maximum allowed is {max}")]
    TooManySubRecords {
        kind: &'static str,
        count: usize,
        max: usize,
    },
}

/// Validation failures for the configured service/characteristic map.
/// Produced before any transport traffic; the manager maps these into
/// [`ConnectError`] variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no services or characteristics configured")]
    EmptyConfiguration,

    #[error("no characteristics configured for services: {0}")]
    NoCharacteristicsConfigured(String),

    #[error("recording not supported from services: {0}")]
    ServicesNotSupported(String),

    #[error("recording not supported from characteristics: {0}")]
    CharacteristicsNotSupported(String),
}

/// Failures while establishing or tearing down a device connection.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("not authorised to use the Bluetooth transport")]
    NotAuthorized,

    #[error("input device unavailable: {0}")]
    InputDeviceUnavailable(String),

    #[error("no services or characteristics configured")]
    EmptyConfiguration,

    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("failed to connect: {0}")]
    FailedToConnect(String),

    #[error("output file already exists: {}", path.display())]
    OutputFileExists { path: PathBuf },

    #[error("cannot create output file {}: {source}", path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to disconnect: {0}")]
    FailedToDisconnect(String),
}

impl From<ConfigError> for ConnectError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::EmptyConfiguration => ConnectError::EmptyConfiguration,
            other => ConnectError::UnsupportedConfiguration(other.to_string()),
        }
    }
}

/// Failures while starting or stopping the recording writers.
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to start recording: {0}")]
    FailedToStart(String),

    #[error("only {started} of {total} writers started")]
    FailedToStartFromAllDevices { started: usize, total: usize },

    #[error("failed to stop recording: {0}")]
    FailedToStop(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_maps_into_connect_error() {
        let err: ConnectError = ConfigError::EmptyConfiguration.into();
        assert!(matches!(err, ConnectError::EmptyConfiguration));

        let err: ConnectError = ConfigError::ServicesNotSupported("[ 1822 ]".into()).into();
        match err {
            ConnectError::UnsupportedConfiguration(msg) => assert!(msg.contains("1822")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn decode_errors_render_the_offending_sizes() {
        let err = DecodeError::FrameTooSmall {
            expected: 10,
            actual: 4,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains('4'));

        let err = DecodeError::TooManySubRecords {
            kind: "RR interval",
            count: 12,
            max: 9,
        };
        assert!(err.to_string().contains("RR interval"));
    }
}
