use crate::signal::SignalType;

use super::bas::BasSample;
use super::hrs::HrsSample;
use super::nco::NcoSample;
use super::nds::NdsSample;
use super::npit::NpitSample;
use super::nppg::NppgSample;

/// One decoded notification, one case per characteristic format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSample {
    Bas(BasSample),
    Hrs(HrsSample),
    Nco(NcoSample),
    Nds(NdsSample),
    Npit(NpitSample),
    Nppg(NppgSample),
}

impl DecodedSample {
    pub fn timestamp(&self) -> u64 {
        match self {
            DecodedSample::Bas(sample) => sample.timestamp,
            DecodedSample::Hrs(sample) => sample.timestamp,
            DecodedSample::Nco(sample) => sample.timestamp,
            DecodedSample::Nds(sample) => sample.timestamp,
            DecodedSample::Npit(sample) => sample.timestamp,
            DecodedSample::Nppg(sample) => sample.timestamp,
        }
    }

    /// The CSV rows for this sample, each newline-terminated. Every format
    /// emits one row per frame except PPG, which emits one row per sample.
    pub fn csv_rows(&self) -> String {
        match self {
            DecodedSample::Bas(sample) => sample.csv_rows(),
            DecodedSample::Hrs(sample) => sample.csv_rows(),
            DecodedSample::Nco(sample) => sample.csv_rows(),
            DecodedSample::Nds(sample) => sample.csv_rows(),
            DecodedSample::Npit(sample) => sample.csv_rows(),
            DecodedSample::Nppg(sample) => sample.csv_rows(),
        }
    }

    /// Raw integer value for one signal type, `None` when this format does
    /// not carry it. For signals with repeated sub-records (RR intervals,
    /// pulses, PPG samples) the first value in the frame is returned.
    pub fn value(&self, signal_type: SignalType) -> Option<i64> {
        match self {
            DecodedSample::Bas(sample) => sample.value(signal_type),
            DecodedSample::Hrs(sample) => sample.value(signal_type),
            DecodedSample::Nco(sample) => sample.value(signal_type),
            DecodedSample::Nds(sample) => sample.value(signal_type),
            DecodedSample::Npit(sample) => sample.value(signal_type),
            DecodedSample::Nppg(sample) => sample.value(signal_type),
        }
    }
}
