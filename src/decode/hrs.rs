//! Heart Rate Service (HRS), characteristic 2A37 "Heart Rate Measurement".
//!
//! Version 1.0 as published by the Bluetooth standard on 2011/07/12. The
//! flags byte selects an 8-bit or 16-bit heart rate and whether RR
//! intervals follow. Unlike the rest of the device's formats, the 16-bit
//! values here arrive low byte first.

use crate::ble::transport::Frame;
use crate::error::DecodeError;
use crate::signal::{Signal, SignalType};

use super::{csv_row, describe_signals, INFO_HEADER, TIMESTAMP_INFO};

/// The most RR intervals a single Heart Rate Measurement frame can carry.
pub const MAX_RR_INTERVALS: usize = 9;

/// The flags byte at the start of every HRS frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HrsFlags(u8);

impl HrsFlags {
    pub const HR_16_BIT: HrsFlags = HrsFlags(0b0000_0001);
    pub const RR_INTERVAL: HrsFlags = HrsFlags(0b0001_0000);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: HrsFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrsSample {
    pub timestamp: u64,
    pub hr: i64,
    pub rr_intervals: Vec<i64>,
}

impl HrsSample {
    pub fn empty() -> Self {
        Self {
            timestamp: 0,
            hr: 0,
            rr_intervals: Vec::new(),
        }
    }

    pub fn csv_rows(&self) -> String {
        let mut fields = Vec::with_capacity(2 + MAX_RR_INTERVALS);
        fields.push(self.timestamp.to_string());
        fields.push(self.hr.to_string());
        for interval in &self.rr_intervals {
            fields.push(interval.to_string());
        }
        fields.resize(2 + MAX_RR_INTERVALS, String::new());
        csv_row(&fields)
    }

    pub fn value(&self, signal_type: SignalType) -> Option<i64> {
        match signal_type {
            SignalType::Hr => Some(self.hr),
            SignalType::RrInterval => self.rr_intervals.first().copied(),
            _ => None,
        }
    }
}

pub(crate) fn decode(frame: &Frame) -> Result<Option<HrsSample>, DecodeError> {
    let data = &frame.data;
    if data.is_empty() {
        return Ok(None);
    }

    let flags = HrsFlags::from_bits(data[0]);

    let (hr, rr_start) = if flags.contains(HrsFlags::HR_16_BIT) {
        if data.len() < 3 {
            return Err(DecodeError::FrameTooSmall {
                expected: 3,
                actual: data.len(),
            });
        }
        (((data[2] as i64) << 8) + data[1] as i64, 3)
    } else {
        if data.len() < 2 {
            return Err(DecodeError::FrameTooSmall {
                expected: 2,
                actual: data.len(),
            });
        }
        (data[1] as i64, 2)
    };

    let rr_intervals = if flags.contains(HrsFlags::RR_INTERVAL) {
        // Low byte first, a trailing odd byte is ignored.
        let intervals: Vec<i64> = data[rr_start..]
            .chunks_exact(2)
            .map(|pair| ((pair[1] as i64) << 8) + pair[0] as i64)
            .collect();
        if intervals.len() > MAX_RR_INTERVALS {
            return Err(DecodeError::TooManySubRecords {
                kind: "RR interval",
                count: intervals.len(),
                max: MAX_RR_INTERVALS,
            });
        }
        intervals
    } else {
        Vec::new()
    };

    Ok(Some(HrsSample {
        timestamp: frame.timestamp,
        hr,
        rr_intervals,
    }))
}

pub(crate) fn csv_header() -> String {
    let rr_columns = vec![SignalType::RrInterval.short_name(); MAX_RR_INTERVALS].join(",");
    format!("Timestamp,{},{}\n", SignalType::Hr.short_name(), rr_columns)
}

pub(crate) fn info_description() -> String {
    format!(
        "{INFO_HEADER}\n{TIMESTAMP_INFO}\n{}",
        describe_signals(&[SignalType::Hr, SignalType::RrInterval], signal)
    )
}

pub(crate) fn signal(signal_type: SignalType) -> Option<Signal> {
    match signal_type {
        SignalType::Hr => Some(Signal::new(signal_type, "bpm", 1.0, 1)),
        SignalType::RrInterval => Some(Signal::new(signal_type, "ms", 1000.0 / 1024.0, 1)),
        _ => None,
    }
}
