//! Nonin Pulse Interval Time (NPIT), characteristic
//! 34E27863-76FF-4F8E-96F1-9E3993AA6199.
//!
//! Version "113142-000-02" Rev B as published by Nonin. Multi-byte values
//! are big-endian. After the fixed prologue the frame carries up to six
//! 4-byte pulse records.

use crate::ble::transport::Frame;
use crate::error::DecodeError;
use crate::signal::{Signal, SignalType};

use super::{be16, check_length_prefix, csv_row, describe_signals, name_signals};
use super::{INFO_HEADER, TIMESTAMP_INFO};

const MINIMUM_PACKET_LENGTH: usize = 4;
const PULSE_BYTE_LENGTH: usize = 4;
const BAD_PULSE_FLAG_MASK: u8 = 0b0100_0000;
const PAI_MSO_MASK: u8 = 0b0000_1111;
const CSV_COLUMNS_PER_PULSE: usize = 3;

/// The protocol allows at most 6 pulses per frame.
pub const MAX_PULSES: usize = 6;

/// The signal status byte (byte 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NpitStatus(u8);

impl NpitStatus {
    pub const INVALID_SIGNAL: NpitStatus = NpitStatus(0b0000_0001);
    pub const PULSE_RATE_HIGH: NpitStatus = NpitStatus(0b0000_0010);

    /// Bits in CSV column order.
    pub const ALL: [NpitStatus; 2] = [Self::INVALID_SIGNAL, Self::PULSE_RATE_HIGH];

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: NpitStatus) -> bool {
        self.0 & other.0 == other.0
    }
}

/// One pulse record: quality flag, pulse amplitude index and the beat's
/// pulse interval time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpitPulse {
    pub bad_pulse: bool,
    pub pai: i64,
    pub pulse_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpitSample {
    pub timestamp: u64,
    pub counter: i64,
    pub status: NpitStatus,
    pub pulses: Vec<NpitPulse>,
}

impl NpitSample {
    pub fn empty() -> Self {
        Self {
            timestamp: 0,
            counter: 0,
            status: NpitStatus::default(),
            pulses: Vec::new(),
        }
    }

    pub fn csv_rows(&self) -> String {
        let mut fields = Vec::with_capacity(5 + MAX_PULSES * CSV_COLUMNS_PER_PULSE);
        fields.push(self.timestamp.to_string());
        fields.push(self.counter.to_string());
        fields.push(self.status.bits().to_string());
        for bit in NpitStatus::ALL {
            fields.push(if self.status.contains(bit) { "1" } else { "0" }.to_string());
        }
        for pulse in &self.pulses {
            fields.push(if pulse.bad_pulse { "1" } else { "0" }.to_string());
            fields.push(pulse.pai.to_string());
            fields.push(pulse.pulse_time.to_string());
        }
        fields.resize(5 + MAX_PULSES * CSV_COLUMNS_PER_PULSE, String::new());
        csv_row(&fields)
    }

    pub fn value(&self, signal_type: SignalType) -> Option<i64> {
        match signal_type {
            SignalType::Counter => Some(self.counter),
            SignalType::Pai => self.pulses.first().map(|pulse| pulse.pai),
            SignalType::PulseTime => self.pulses.first().map(|pulse| pulse.pulse_time),
            _ => None,
        }
    }
}

pub(crate) fn decode(frame: &Frame) -> Result<Option<NpitSample>, DecodeError> {
    let data = &frame.data;
    if data.is_empty() {
        return Ok(None);
    }
    check_length_prefix(data, MINIMUM_PACKET_LENGTH)?;

    // Pulses start on byte 4, each 4 bytes long.
    let pulse_count = (data.len() - MINIMUM_PACKET_LENGTH) / PULSE_BYTE_LENGTH;
    if pulse_count > MAX_PULSES {
        return Err(DecodeError::TooManySubRecords {
            kind: "pulse",
            count: pulse_count,
            max: MAX_PULSES,
        });
    }

    let pulses = data[MINIMUM_PACKET_LENGTH..]
        .chunks_exact(PULSE_BYTE_LENGTH)
        .map(|record| NpitPulse {
            bad_pulse: record[0] & BAD_PULSE_FLAG_MASK > 0,
            pai: be16(record[0] & PAI_MSO_MASK, record[1]),
            pulse_time: be16(record[2], record[3]),
        })
        .collect();

    Ok(Some(NpitSample {
        timestamp: frame.timestamp,
        counter: be16(data[1], data[2]),
        status: NpitStatus::from_bits(data[3]),
        pulses,
    }))
}

pub(crate) fn csv_header() -> String {
    let pulse_columns = format!(
        "Bad_pulse,{}",
        name_signals(&[SignalType::Pai, SignalType::PulseTime])
    );
    let all_pulses = vec![pulse_columns; MAX_PULSES].join(",");
    format!(
        "Timestamp,{},Status,Invalid_signal,Pulse_rate_high,{all_pulses}\n",
        SignalType::Counter.short_name()
    )
}

pub(crate) fn info_description() -> String {
    let counter = describe_signals(&[SignalType::Counter], signal);
    let pulse_signals = describe_signals(&[SignalType::Pai, SignalType::PulseTime], signal);
    format!(
        "{INFO_HEADER}\n{TIMESTAMP_INFO}\n{counter}\n\
         Status , \"Signal status\" , bitset , ,\n\
         Invalid_signal , \"Invalid signal flag\" , boolean , ,\n\
         Pulse_rate_high , \"Pulse Rate too high for this feature\" , boolean , ,\n\
         Bad_pulse , \"The given pulse has poor signal quality\" , boolean , ,\n\
         {pulse_signals}"
    )
}

pub(crate) fn signal(signal_type: SignalType) -> Option<Signal> {
    match signal_type {
        SignalType::Counter => Some(Signal::new(signal_type, "uint16", 1.0, 1)),
        SignalType::Pai => Some(Signal::new(signal_type, "%", 0.01, 1)),
        SignalType::PulseTime => Some(Signal::new(signal_type, "ms", 0.1, 1)),
        _ => None,
    }
}
