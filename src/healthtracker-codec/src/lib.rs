#[macro_use]
extern crate serde;

pub mod constants;

mod error;
pub use error::CodecError;

mod helpers;

mod heart_rate;
pub use heart_rate::HeartRateSample;

mod spo2;
pub use spo2::SpO2Sample;

mod ring_data;
pub use ring_data::{RingData, payload_hex};
