use std::fmt;

use crate::{error::CodecError, helpers::FrameReader};

/// A vendor SpO2 notification; the saturation percentage sits in byte 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpO2Sample {
    pub percentage: u8,
}

impl SpO2Sample {
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        payload.check_len()?;
        Ok(Self {
            percentage: payload.byte_or_zero(1),
        })
    }
}

impl fmt::Display for SpO2Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpO2: {}%", self.percentage)
    }
}
