//! Nonin PPG waveform (NPPG), characteristic
//! EC0A883A-4D24-11E7-B114-B2F933D5FE66.
//!
//! Version "113142-000-02" Rev B as published by Nonin. Multi-byte values
//! are big-endian. Each frame carries 25 waveform samples followed by a
//! 16-bit frame counter.

use crate::ble::transport::Frame;
use crate::error::DecodeError;
use crate::signal::{Signal, SignalType};

use super::{be16, check_length_prefix, csv_row, describe_signals};
use super::{INFO_HEADER, TIMESTAMP_INFO};

/// The device sends 25 PPG samples per frame.
pub const PPG_SAMPLES_PER_FRAME: usize = 25;

/// Samples, plus the length byte and the 2-byte counter.
const MINIMUM_PACKET_LENGTH: usize = PPG_SAMPLES_PER_FRAME * 2 + 1 + 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NppgSample {
    pub timestamp: u64,
    pub counter: i64,
    pub ppg: Vec<i64>,
}

impl NppgSample {
    pub fn empty() -> Self {
        Self {
            timestamp: 0,
            counter: 0,
            ppg: Vec::new(),
        }
    }

    /// One row per PPG sample, repeating timestamp and counter, with the
    /// 0-based sample index in the Packet_sequence column.
    pub fn csv_rows(&self) -> String {
        self.ppg
            .iter()
            .enumerate()
            .map(|(index, value)| {
                csv_row(&[
                    self.timestamp.to_string(),
                    self.counter.to_string(),
                    index.to_string(),
                    value.to_string(),
                ])
            })
            .collect()
    }

    pub fn value(&self, signal_type: SignalType) -> Option<i64> {
        match signal_type {
            SignalType::Counter => Some(self.counter),
            SignalType::Ppg => self.ppg.first().copied(),
            _ => None,
        }
    }
}

pub(crate) fn decode(frame: &Frame) -> Result<Option<NppgSample>, DecodeError> {
    let data = &frame.data;
    if data.is_empty() {
        return Ok(None);
    }
    check_length_prefix(data, MINIMUM_PACKET_LENGTH)?;

    let ppg = data[1..1 + PPG_SAMPLES_PER_FRAME * 2]
        .chunks_exact(2)
        .map(|pair| be16(pair[0], pair[1]))
        .collect();
    let counter = be16(data[data.len() - 2], data[data.len() - 1]);

    Ok(Some(NppgSample {
        timestamp: frame.timestamp,
        counter,
        ppg,
    }))
}

pub(crate) fn csv_header() -> String {
    format!(
        "Timestamp,{},Packet_sequence,{}\n",
        SignalType::Counter.short_name(),
        SignalType::Ppg.short_name()
    )
}

pub(crate) fn info_description() -> String {
    let counter = describe_signals(&[SignalType::Counter], signal);
    let ppg = describe_signals(&[SignalType::Ppg], signal);
    format!(
        "{INFO_HEADER}\n{TIMESTAMP_INFO}\n{counter}\n\
         Packet_sequence , \"0-24 packet sequence counter\" , numeric , ,\n{ppg}"
    )
}

pub(crate) fn signal(signal_type: SignalType) -> Option<Signal> {
    match signal_type {
        SignalType::Counter => Some(Signal::new(signal_type, "uint16", 1.0, 3)),
        SignalType::Ppg => Some(Signal::new(signal_type, "a.d.u.", 1.0, 75)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal_frame() -> Frame {
        let mut data = vec![MINIMUM_PACKET_LENGTH as u8];
        for sample in 0..PPG_SAMPLES_PER_FRAME as u16 {
            data.extend_from_slice(&(sample * 10).to_be_bytes());
        }
        data.extend_from_slice(&0x0102u16.to_be_bytes());
        Frame::new(11, data)
    }

    #[test]
    fn decodes_all_samples_and_the_trailing_counter() {
        let sample = decode(&nominal_frame()).unwrap().unwrap();
        assert_eq!(sample.counter, 0x0102);
        assert_eq!(sample.ppg.len(), PPG_SAMPLES_PER_FRAME);
        assert_eq!(sample.ppg[0], 0);
        assert_eq!(sample.ppg[24], 240);
    }

    #[test]
    fn emits_one_row_per_sample() {
        let sample = decode(&nominal_frame()).unwrap().unwrap();
        let rows = sample.csv_rows();
        let lines: Vec<&str> = rows.lines().collect();
        assert_eq!(lines.len(), PPG_SAMPLES_PER_FRAME);
        assert_eq!(lines[0], "11,258,0,0");
        assert_eq!(lines[24], "11,258,24,240");
        // Every row repeats the shared timestamp/counter pair.
        assert!(lines.iter().all(|line| line.starts_with("11,258,")));
    }

    #[test]
    fn short_frame_with_correct_length_byte_is_too_small() {
        assert_eq!(
            decode(&Frame::new(0, vec![3, 0, 0])),
            Err(DecodeError::FrameTooSmall {
                expected: MINIMUM_PACKET_LENGTH,
                actual: 3
            })
        );
    }
}
