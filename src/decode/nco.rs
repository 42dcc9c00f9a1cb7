//! Nonin Continuous Oximetry (NCO), characteristic
//! 0AAD7EA0-0D60-11E2-8E3C-0002A5D5C51B.
//!
//! Version "113142-000-02" Rev B as published by Nonin. Multi-byte values
//! are big-endian.

use crate::ble::transport::Frame;
use crate::error::DecodeError;
use crate::signal::{Signal, SignalType};

use super::{be16, check_length_prefix, csv_row, describe_signals, name_signals};
use super::{INFO_HEADER, TIMESTAMP_INFO};

const MINIMUM_PACKET_LENGTH: usize = 10;

/// The device status byte (byte 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NcoStatus(u8);

impl NcoStatus {
    pub const WEAK_SIGNAL: NcoStatus = NcoStatus(0b0000_0010);
    pub const SMART_POINT: NcoStatus = NcoStatus(0b0000_0100);
    pub const SEARCHING: NcoStatus = NcoStatus(0b0000_1000);
    pub const SENSOR_CONNECTED: NcoStatus = NcoStatus(0b0001_0000);
    pub const LOW_BATTERY: NcoStatus = NcoStatus(0b0010_0000);
    pub const ENCRYPTED: NcoStatus = NcoStatus(0b0100_0000);

    /// Bits in CSV column order.
    pub const ALL: [NcoStatus; 6] = [
        Self::WEAK_SIGNAL,
        Self::SMART_POINT,
        Self::SEARCHING,
        Self::SENSOR_CONNECTED,
        Self::LOW_BATTERY,
        Self::ENCRYPTED,
    ];

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: NcoStatus) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NcoSample {
    pub timestamp: u64,
    pub status: NcoStatus,
    pub battery_voltage: i64,
    pub pai: i64,
    pub counter: i64,
    pub spo2: i64,
    pub hr: i64,
}

impl NcoSample {
    pub fn empty() -> Self {
        Self {
            timestamp: 0,
            status: NcoStatus::default(),
            battery_voltage: 0,
            pai: 0,
            counter: 0,
            spo2: 0,
            hr: 0,
        }
    }

    pub fn csv_rows(&self) -> String {
        let mut fields = vec![
            self.timestamp.to_string(),
            self.counter.to_string(),
            self.battery_voltage.to_string(),
            self.pai.to_string(),
            self.spo2.to_string(),
            self.hr.to_string(),
            self.status.bits().to_string(),
        ];
        for bit in NcoStatus::ALL {
            fields.push(if self.status.contains(bit) { "1" } else { "0" }.to_string());
        }
        csv_row(&fields)
    }

    pub fn value(&self, signal_type: SignalType) -> Option<i64> {
        match signal_type {
            SignalType::BatteryVoltage => Some(self.battery_voltage),
            SignalType::Pai => Some(self.pai),
            SignalType::Counter => Some(self.counter),
            SignalType::SpO2 => Some(self.spo2),
            SignalType::Hr => Some(self.hr),
            _ => None,
        }
    }
}

pub(crate) fn decode(frame: &Frame) -> Result<Option<NcoSample>, DecodeError> {
    let data = &frame.data;
    if data.is_empty() {
        return Ok(None);
    }
    check_length_prefix(data, MINIMUM_PACKET_LENGTH)?;

    Ok(Some(NcoSample {
        timestamp: frame.timestamp,
        status: NcoStatus::from_bits(data[1]),
        battery_voltage: data[2] as i64,
        pai: be16(data[3], data[4]),
        counter: be16(data[5], data[6]),
        spo2: data[7] as i64,
        hr: be16(data[8], data[9]),
    }))
}

pub(crate) fn csv_header() -> String {
    let signals = name_signals(&[
        SignalType::Counter,
        SignalType::BatteryVoltage,
        SignalType::Pai,
        SignalType::SpO2,
        SignalType::Hr,
    ]);
    let status_labels = "Weak_signal,Smart_point,Searching_for_pulse,\
                         Sensor_connected,low_battery,encrypted";
    format!("Timestamp,{signals},Status,{status_labels}\n")
}

pub(crate) fn info_description() -> String {
    let signals = describe_signals(
        &[
            SignalType::Counter,
            SignalType::BatteryVoltage,
            SignalType::Pai,
            SignalType::SpO2,
            SignalType::Hr,
        ],
        signal,
    );
    let status_info = concat!(
        "Weak_signal , \"Pulse signal strength is 0.3% modulation or less\" , boolean , ,\n",
        "Smart_point , \"Data passed the SmartPoint Algorithm\" , boolean , ,\n",
        "Searching_for_pulse , \"Searching for consecutive pulse signals\" , boolean , ,\n",
        "Sensor_connected , \"1 -> Sensor is correctly fitted on finger\" , boolean , ,\n",
        "low_battery , \"Batteries are low\" , boolean , ,\n",
        "encrypted , \"1 -> connection is encrypted\" , boolean , ,",
    );
    format!(
        "{INFO_HEADER}\n{TIMESTAMP_INFO}\n{signals}\n\
         Status , \"device status\" , bitset , ,\n{status_info}"
    )
}

pub(crate) fn signal(signal_type: SignalType) -> Option<Signal> {
    match signal_type {
        SignalType::BatteryVoltage => Some(Signal::new(signal_type, "V", 0.1, 1)),
        SignalType::Pai => Some(Signal::new(signal_type, "%", 0.01, 1)),
        SignalType::Counter => Some(Signal::new(signal_type, "uint16", 1.0, 1)),
        SignalType::SpO2 => Some(Signal::new(signal_type, "%", 1.0, 1)),
        SignalType::Hr => Some(Signal::new(signal_type, "bpm", 1.0, 1)),
        _ => None,
    }
}
