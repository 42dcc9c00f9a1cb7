use super::SignalType;

/// One value recorded by the device, usually an 8-bit or 16-bit raw reading.
/// The reading in physical units is `value as f32 * gain`, e.g. a raw
/// battery voltage of 36 with gain 0.1 is 3.6 V.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub signal_type: SignalType,
    pub units: &'static str,
    pub gain: f32,
    /// Sampling frequency in Hz.
    pub frequency: u32,
    /// Raw integer value, preserved exactly as decoded from the wire.
    pub value: i64,
}

impl Signal {
    pub fn new(signal_type: SignalType, units: &'static str, gain: f32, frequency: u32) -> Self {
        Self {
            signal_type,
            units,
            gain,
            frequency,
            value: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.signal_type.short_name()
    }

    pub fn long_name(&self) -> &'static str {
        self.signal_type.long_name()
    }

    /// One line for the companion info file, in the format:
    ///
    /// `name , "description" , units , gain , frequency`
    pub fn csv_description(&self) -> String {
        format!(
            "{} , \"{}\" , {} , {} , {}",
            self.name(),
            self.long_name(),
            self.units,
            self.gain,
            self.frequency
        )
    }
}
