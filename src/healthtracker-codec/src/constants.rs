use uuid::Uuid;

/// Expands a 16-bit Bluetooth SIG assigned number against the base UUID
/// `0000xxxx-0000-1000-8000-00805f9b34fb`.
pub const fn sig_uuid(short: u16) -> Uuid {
    Uuid::from_u128(((short as u128) << 96) | 0x0000_0000_0000_1000_8000_0080_5f9b_34fb)
}

pub const HEART_RATE_SERVICE: Uuid = sig_uuid(0x180D);
pub const HEART_RATE_MEASUREMENT: Uuid = sig_uuid(0x2A37);

// Vendor SpO2 characteristic, reusing the SIG pulse oximeter numbers.
pub const SPO2_SERVICE: Uuid = sig_uuid(0x1822);
pub const SPO2_MEASUREMENT: Uuid = sig_uuid(0x2A5F);

/// Bit 0 of the Heart Rate Measurement flags: value is a little-endian u16.
pub const HR_VALUE_FORMAT_U16: u8 = 0x01;

/// Flag byte plus at least one value byte.
pub const MIN_FRAME_LEN: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sig_uuids_expand_against_base() {
        assert_eq!(
            HEART_RATE_SERVICE.to_string(),
            "0000180d-0000-1000-8000-00805f9b34fb"
        );
        assert_eq!(
            HEART_RATE_MEASUREMENT.to_string(),
            "00002a37-0000-1000-8000-00805f9b34fb"
        );
        assert_eq!(
            SPO2_MEASUREMENT.to_string(),
            "00002a5f-0000-1000-8000-00805f9b34fb"
        );
    }
}
