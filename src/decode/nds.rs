//! Nonin Device Status (NDS), characteristic
//! EC0A9302-4D24-11E7-B114-B2F933D5FE66.
//!
//! Version "113142-000-02" Rev B as published by Nonin. Multi-byte values
//! are big-endian.

use crate::ble::transport::Frame;
use crate::error::DecodeError;
use crate::signal::{Signal, SignalType};

use super::{be16, check_length_prefix, csv_row, describe_signals, name_signals};
use super::{INFO_HEADER, TIMESTAMP_INFO};

const MINIMUM_PACKET_LENGTH: usize = 7;

/// The type of sensor connected (byte 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorType(u8);

impl SensorType {
    pub const PULSE_OXIMETER: SensorType = SensorType(0b0000_0001);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: SensorType) -> bool {
        self.0 & other.0 == other.0
    }
}

/// The device error byte (byte 2). The named values are exact bit patterns,
/// not independent flags: 0b101 is a sensor fault, not a sensor fault plus
/// a missing sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceError(u8);

impl DeviceError {
    pub const NO_ERROR: DeviceError = DeviceError(0b0000_0000);
    pub const NO_SENSOR_CONNECTED: DeviceError = DeviceError(0b0000_0001);
    pub const SENSOR_FAULT: DeviceError = DeviceError(0b0000_0101);
    pub const SYSTEM_ERROR: DeviceError = DeviceError(0b0000_0110);

    /// Patterns in CSV column order.
    pub const ALL: [DeviceError; 4] = [
        Self::NO_ERROR,
        Self::NO_SENSOR_CONNECTED,
        Self::SENSOR_FAULT,
        Self::SYSTEM_ERROR,
    ];

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Whether this error byte matches the given named pattern. An exact
    /// comparison, so the No_error column is 1 only for a clean byte.
    pub fn matches(&self, pattern: DeviceError) -> bool {
        self.0 == pattern.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdsSample {
    pub timestamp: u64,
    pub counter: i64,
    pub battery_voltage: i64,
    pub battery_percentage: i64,
    pub sensor: SensorType,
    pub error: DeviceError,
}

impl NdsSample {
    pub fn empty() -> Self {
        Self {
            timestamp: 0,
            counter: 0,
            battery_voltage: 0,
            battery_percentage: 0,
            sensor: SensorType::default(),
            error: DeviceError::default(),
        }
    }

    pub fn csv_rows(&self) -> String {
        let mut fields = vec![
            self.timestamp.to_string(),
            self.counter.to_string(),
            self.battery_voltage.to_string(),
            self.battery_percentage.to_string(),
            self.sensor.bits().to_string(),
            if self.sensor.contains(SensorType::PULSE_OXIMETER) {
                "1"
            } else {
                "0"
            }
            .to_string(),
            self.error.bits().to_string(),
        ];
        for pattern in DeviceError::ALL {
            fields.push(if self.error.matches(pattern) { "1" } else { "0" }.to_string());
        }
        csv_row(&fields)
    }

    pub fn value(&self, signal_type: SignalType) -> Option<i64> {
        match signal_type {
            SignalType::BatteryVoltage => Some(self.battery_voltage),
            SignalType::BatteryPercentage => Some(self.battery_percentage),
            SignalType::Counter => Some(self.counter),
            _ => None,
        }
    }
}

pub(crate) fn decode(frame: &Frame) -> Result<Option<NdsSample>, DecodeError> {
    let data = &frame.data;
    if data.is_empty() {
        return Ok(None);
    }
    check_length_prefix(data, MINIMUM_PACKET_LENGTH)?;

    Ok(Some(NdsSample {
        timestamp: frame.timestamp,
        counter: be16(data[5], data[6]),
        battery_voltage: data[3] as i64,
        battery_percentage: data[4] as i64,
        sensor: SensorType::from_bits(data[1]),
        error: DeviceError::from_bits(data[2]),
    }))
}

pub(crate) fn csv_header() -> String {
    let signals = name_signals(&[
        SignalType::Counter,
        SignalType::BatteryVoltage,
        SignalType::BatteryPercentage,
    ]);
    format!(
        "Timestamp,{signals},Sensor_type,Pulse_oximeter,\
         Device_error,No_error,No_sensor_connected,Sensor_fault,System_error\n"
    )
}

pub(crate) fn info_description() -> String {
    let signals = describe_signals(
        &[
            SignalType::Counter,
            SignalType::BatteryVoltage,
            SignalType::BatteryPercentage,
        ],
        signal,
    );
    let device_error_info = concat!(
        "No_error , \"No errors reported by the device\" , boolean , ,\n",
        "No_sensor_connected , \"No sensor is connected to the device\" , boolean , ,\n",
        "Sensor_fault , \"A fault in the sensor has been detected\" , boolean , ,\n",
        "System_error , \"An error internally occurred\" , boolean , ,",
    );
    format!(
        "{INFO_HEADER}\n{TIMESTAMP_INFO}\n{signals}\n\
         Sensor_type , \"\" , bitset , ,\n\
         Pulse_oximeter , \"Pulse Oximeter Sensor is attached\" , boolean , ,\n\
         Device_error , \"\" , bitset , ,\n{device_error_info}"
    )
}

pub(crate) fn signal(signal_type: SignalType) -> Option<Signal> {
    match signal_type {
        SignalType::BatteryVoltage => Some(Signal::new(signal_type, "V", 0.1, 1)),
        SignalType::BatteryPercentage => Some(Signal::new(signal_type, "%", 1.0, 1)),
        SignalType::Counter => Some(Signal::new(signal_type, "uint16", 1.0, 1)),
        _ => None,
    }
}
