use crate::{constants::MIN_FRAME_LEN, error::CodecError};

pub trait FrameReader {
    /// Fails with `InvalidFrame` unless the payload holds a flag byte and one value byte.
    fn check_len(&self) -> Result<(), CodecError>;
    /// Byte at `index`, or 0 when the payload stops short of it.
    fn byte_or_zero(&self, index: usize) -> u8;

    fn flags(&self) -> u8 {
        self.byte_or_zero(0)
    }

    fn read_u16_le_lossy(&self, index: usize) -> u16 {
        u16::from_le_bytes([self.byte_or_zero(index), self.byte_or_zero(index + 1)])
    }
}

impl FrameReader for [u8] {
    fn check_len(&self) -> Result<(), CodecError> {
        if self.len() < MIN_FRAME_LEN {
            return Err(CodecError::InvalidFrame { len: self.len() });
        }
        Ok(())
    }

    fn byte_or_zero(&self, index: usize) -> u8 {
        self.get(index).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_payloads_fail_length_check() {
        let empty: &[u8] = &[];
        assert_eq!(empty.check_len(), Err(CodecError::InvalidFrame { len: 0 }));
        assert_eq!(
            [0x00_u8].as_slice().check_len(),
            Err(CodecError::InvalidFrame { len: 1 })
        );
        assert!([0x00_u8, 0x01].as_slice().check_len().is_ok());
    }

    #[test]
    fn missing_bytes_read_as_zero() {
        let buf = [0x01_u8, 0x48];
        assert_eq!(buf.as_slice().byte_or_zero(1), 0x48);
        assert_eq!(buf.as_slice().byte_or_zero(2), 0);
        assert_eq!(buf.as_slice().read_u16_le_lossy(1), 0x48);
    }

    #[test]
    fn read_u16_le_lossy_combines_low_and_high() {
        let buf = [0x01_u8, 0xFF, 0x01];
        assert_eq!(buf.as_slice().read_u16_le_lossy(1), 0x01FF);
    }
}
