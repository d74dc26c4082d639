use std::fmt;

use crate::{constants::HR_VALUE_FORMAT_U16, error::CodecError, helpers::FrameReader};

/// One Heart Rate Measurement (`0x2A37`) notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub bpm: u16,
}

impl HeartRateSample {
    /// Decodes a raw notification payload.
    ///
    /// Byte 0 holds the flags; bit 0 selects between an 8-bit value at byte 1
    /// and a little-endian 16-bit value at bytes 1..=2. A 16-bit frame that is
    /// missing its high byte decodes with that byte as zero instead of failing.
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        payload.check_len()?;

        let bpm = if payload.flags() & HR_VALUE_FORMAT_U16 != 0 {
            payload.read_u16_le_lossy(1)
        } else {
            u16::from(payload.byte_or_zero(1))
        };

        Ok(Self { bpm })
    }
}

impl fmt::Display for HeartRateSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}
