//! Binary frame decoders, one per characteristic format, plus the closed
//! [`Decoder`] dispatch enum and the [`DecodedSample`] output variant.
//!
//! Decoding is pure: bytes plus a capture timestamp in, a structured sample
//! or a [`DecodeError`] out. The device transmits multi-byte integers
//! big-endian; the heart-rate service is the one exception and is noted in
//! its own module.

pub mod bas;
pub mod hrs;
pub mod nco;
pub mod nds;
pub mod npit;
pub mod nppg;
mod sample;

pub use sample::DecodedSample;

use crate::ble::transport::Frame;
use crate::ble::{BleUuid, CharacteristicLabel};
use crate::error::DecodeError;
use crate::signal::{Signal, SignalType};

/// First line of every companion info file.
pub(crate) const INFO_HEADER: &str = "name , description, units, gain, frequency";

/// Info line for the timestamp column shared by every format.
pub(crate) const TIMESTAMP_INFO: &str = "Timestamp , \"Unix epoch\" , nanoseconds , ,";

/// Big-endian 16-bit read, MSB first.
#[inline]
pub(crate) fn be16(hi: u8, lo: u8) -> i64 {
    ((hi as i64) << 8) + lo as i64
}

/// Shared prologue for the length-prefixed formats (NCO, NDS, NPIT, NPPG):
/// the declared length is validated before the minimum-size check, so a
/// truncated frame that also lies about its length reports the lie.
pub(crate) fn check_length_prefix(data: &[u8], minimum: usize) -> Result<(), DecodeError> {
    let declared = data[0] as usize;
    if declared != data.len() {
        return Err(DecodeError::MalformedLength {
            declared,
            actual: data.len(),
        });
    }
    if data.len() < minimum {
        return Err(DecodeError::FrameTooSmall {
            expected: minimum,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Join CSV fields into one newline-terminated row. Every row of a format
/// goes through here so the column count stays constant.
pub(crate) fn csv_row(fields: &[String]) -> String {
    let mut row = fields.join(",");
    row.push('\n');
    row
}

/// The decoder for one supported characteristic format, chosen from the
/// characteristic's label when a writer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Bas,
    Hrs,
    Nco,
    Nds,
    Npit,
    Nppg,
}

impl Decoder {
    /// The decoder for a characteristic label, `None` when the label has no
    /// frame format the recorder understands.
    pub fn for_label(label: CharacteristicLabel) -> Option<Decoder> {
        match label {
            CharacteristicLabel::BatteryLevel => Some(Decoder::Bas),
            CharacteristicLabel::HeartRate => Some(Decoder::Hrs),
            CharacteristicLabel::NoninContinuousOximetry => Some(Decoder::Nco),
            CharacteristicLabel::NoninDeviceStatus => Some(Decoder::Nds),
            CharacteristicLabel::NoninPulseIntervalTime => Some(Decoder::Npit),
            CharacteristicLabel::NoninPpg => Some(Decoder::Nppg),
            _ => None,
        }
    }

    pub fn label(&self) -> CharacteristicLabel {
        match self {
            Decoder::Bas => CharacteristicLabel::BatteryLevel,
            Decoder::Hrs => CharacteristicLabel::HeartRate,
            Decoder::Nco => CharacteristicLabel::NoninContinuousOximetry,
            Decoder::Nds => CharacteristicLabel::NoninDeviceStatus,
            Decoder::Npit => CharacteristicLabel::NoninPulseIntervalTime,
            Decoder::Nppg => CharacteristicLabel::NoninPpg,
        }
    }

    pub fn characteristic_id(&self) -> BleUuid {
        self.label().uuid()
    }

    /// Decode one notification frame. An empty payload carries no data and
    /// is not an error.
    pub fn decode(&self, frame: &Frame) -> Result<Option<DecodedSample>, DecodeError> {
        match self {
            Decoder::Bas => Ok(bas::decode(frame)?.map(DecodedSample::Bas)),
            Decoder::Hrs => Ok(hrs::decode(frame)?.map(DecodedSample::Hrs)),
            Decoder::Nco => Ok(nco::decode(frame)?.map(DecodedSample::Nco)),
            Decoder::Nds => Ok(nds::decode(frame)?.map(DecodedSample::Nds)),
            Decoder::Npit => Ok(npit::decode(frame)?.map(DecodedSample::Npit)),
            Decoder::Nppg => Ok(nppg::decode(frame)?.map(DecodedSample::Nppg)),
        }
    }

    /// Newline-terminated CSV header row for the data file.
    pub fn csv_header(&self) -> String {
        match self {
            Decoder::Bas => bas::csv_header(),
            Decoder::Hrs => hrs::csv_header(),
            Decoder::Nco => nco::csv_header(),
            Decoder::Nds => nds::csv_header(),
            Decoder::Npit => npit::csv_header(),
            Decoder::Nppg => nppg::csv_header(),
        }
    }

    /// Multi-line description of every column, for the companion info file.
    pub fn info_description(&self) -> String {
        match self {
            Decoder::Bas => bas::info_description(),
            Decoder::Hrs => hrs::info_description(),
            Decoder::Nco => nco::info_description(),
            Decoder::Nds => nds::info_description(),
            Decoder::Npit => npit::info_description(),
            Decoder::Nppg => nppg::info_description(),
        }
    }

    /// A zero-valued sample, used to prime the published-sample cell.
    pub fn empty_sample(&self) -> DecodedSample {
        match self {
            Decoder::Bas => DecodedSample::Bas(bas::BasSample::empty()),
            Decoder::Hrs => DecodedSample::Hrs(hrs::HrsSample::empty()),
            Decoder::Nco => DecodedSample::Nco(nco::NcoSample::empty()),
            Decoder::Nds => DecodedSample::Nds(nds::NdsSample::empty()),
            Decoder::Npit => DecodedSample::Npit(npit::NpitSample::empty()),
            Decoder::Nppg => DecodedSample::Nppg(nppg::NppgSample::empty()),
        }
    }

    /// The minimal set of vital-sign numerics worth showing live.
    pub fn minimum_numerics(&self) -> Vec<Signal> {
        let labels: &[SignalType] = match self {
            Decoder::Bas => &[SignalType::BatteryPercentage],
            Decoder::Hrs => &[SignalType::Hr],
            Decoder::Nco => &[SignalType::Hr, SignalType::SpO2, SignalType::Pai],
            Decoder::Nds => &[SignalType::BatteryVoltage, SignalType::BatteryPercentage],
            Decoder::Npit => &[SignalType::Pai, SignalType::PulseTime],
            Decoder::Nppg => &[SignalType::Counter],
        };
        labels.iter().filter_map(|label| self.signal(*label)).collect()
    }

    /// Metadata for one signal this format carries, `None` otherwise.
    pub fn signal(&self, signal_type: SignalType) -> Option<Signal> {
        match self {
            Decoder::Bas => bas::signal(signal_type),
            Decoder::Hrs => hrs::signal(signal_type),
            Decoder::Nco => nco::signal(signal_type),
            Decoder::Nds => nds::signal(signal_type),
            Decoder::Npit => npit::signal(signal_type),
            Decoder::Nppg => nppg::signal(signal_type),
        }
    }

}

/// Info lines for a list of signals, one line per signal, using the format's
/// own metadata lookup.
pub(crate) fn describe_signals(
    signals: &[SignalType],
    lookup: fn(SignalType) -> Option<Signal>,
) -> String {
    signals
        .iter()
        .map(|signal_type| match lookup(*signal_type) {
            Some(signal) => signal.csv_description(),
            None => format!(
                "{} , \"{}\" , , , ",
                signal_type.short_name(),
                signal_type.long_name()
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comma-joined short names, used when building CSV headers.
pub(crate) fn name_signals(signals: &[SignalType]) -> String {
    signals
        .iter()
        .map(|signal_type| signal_type.short_name())
        .collect::<Vec<_>>()
        .join(",")
}
