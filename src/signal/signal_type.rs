use serde::{Deserialize, Serialize};

/// The kinds of physiological signals the characteristic decoders produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalType {
    BatteryVoltage,
    BatteryPercentage,
    Pai,
    PulseTime,
    Counter,
    SpO2,
    Hr,
    RrInterval,
    Ppg,
}

impl SignalType {
    /// Short name used for CSV column headers.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::BatteryVoltage => "Batt volt",
            Self::BatteryPercentage => "Bat perc",
            Self::Pai => "PAI",
            Self::PulseTime => "Pulse time",
            Self::Counter => "Counter",
            Self::SpO2 => "SpO2",
            Self::Hr => "HR",
            Self::RrInterval => "RR int",
            Self::Ppg => "PPG",
        }
    }

    /// Long name used for the info/description files.
    pub fn long_name(&self) -> &'static str {
        match self {
            Self::BatteryVoltage => "Battery Voltage",
            Self::BatteryPercentage => "Battery Percentage",
            Self::Pai => "Pulse Amplitude Index",
            Self::PulseTime => "Pulse time",
            Self::Counter => "Frame sequence counter",
            Self::SpO2 => "Peripheral Oxygen Saturation",
            Self::Hr => "Heart Rate",
            Self::RrInterval => "RR interval",
            Self::Ppg => "Photoplethysmogram",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_names_match_the_catalog() {
        assert_eq!(SignalType::Hr.short_name(), "HR");
        assert_eq!(SignalType::Hr.long_name(), "Heart Rate");
        assert_eq!(SignalType::Pai.long_name(), "Pulse Amplitude Index");
        assert_eq!(SignalType::BatteryPercentage.short_name(), "Bat perc");
    }
}
