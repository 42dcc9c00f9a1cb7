//! Decoding and recording pipeline for a BLE pulse oximeter: vendor frame
//! decoders, per-characteristic CSV writers and the device life-cycle
//! orchestrator that drives them.

pub mod ble;
pub mod decode;
pub mod error;
pub mod recorder;
pub mod signal;
