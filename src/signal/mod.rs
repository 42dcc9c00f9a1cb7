pub mod signal_type;
pub mod types;

pub use signal_type::SignalType;
pub use types::Signal;
