//! Battery Service (BAS), characteristic 2A19 "Battery Level".
//!
//! Version 1.0 as published by the Bluetooth standard on 2011/12/27. The
//! battery level is a percentage in the first data byte.

use crate::ble::transport::Frame;
use crate::error::DecodeError;
use crate::signal::{Signal, SignalType};

use super::{csv_row, describe_signals, INFO_HEADER, TIMESTAMP_INFO};

const MINIMUM_PACKET_LENGTH: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasSample {
    pub timestamp: u64,
    pub battery_percentage: i64,
}

impl BasSample {
    pub fn empty() -> Self {
        Self {
            timestamp: 0,
            battery_percentage: 0,
        }
    }

    pub fn csv_rows(&self) -> String {
        csv_row(&[self.timestamp.to_string(), self.battery_percentage.to_string()])
    }

    pub fn value(&self, signal_type: SignalType) -> Option<i64> {
        (signal_type == SignalType::BatteryPercentage).then_some(self.battery_percentage)
    }
}

pub(crate) fn decode(frame: &Frame) -> Result<Option<BasSample>, DecodeError> {
    if frame.data.is_empty() {
        return Ok(None);
    }
    if frame.data.len() < MINIMUM_PACKET_LENGTH {
        return Err(DecodeError::FrameTooSmall {
            expected: MINIMUM_PACKET_LENGTH,
            actual: frame.data.len(),
        });
    }
    Ok(Some(BasSample {
        timestamp: frame.timestamp,
        battery_percentage: frame.data[0] as i64,
    }))
}

pub(crate) fn csv_header() -> String {
    format!("Timestamp,{}\n", SignalType::BatteryPercentage.short_name())
}

pub(crate) fn info_description() -> String {
    format!(
        "{INFO_HEADER}\n{TIMESTAMP_INFO}\n{}",
        describe_signals(&[SignalType::BatteryPercentage], signal)
    )
}

pub(crate) fn signal(signal_type: SignalType) -> Option<Signal> {
    match signal_type {
        SignalType::BatteryPercentage => Some(Signal::new(signal_type, "%", 1.0, 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_percentage_byte() {
        let sample = decode(&Frame::new(42, vec![87])).unwrap().unwrap();
        assert_eq!(sample.timestamp, 42);
        assert_eq!(sample.battery_percentage, 87);
        assert_eq!(sample.csv_rows(), "42,87\n");
    }

    #[test]
    fn header_matches_the_row_shape() {
        assert_eq!(csv_header(), "Timestamp,Bat perc\n");
    }

    #[test]
    fn only_battery_percentage_is_carried() {
        let sample = decode(&Frame::new(0, vec![50])).unwrap().unwrap();
        assert_eq!(sample.value(SignalType::BatteryPercentage), Some(50));
        assert_eq!(sample.value(SignalType::Hr), None);
    }
}
