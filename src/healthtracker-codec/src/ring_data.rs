use std::fmt;

use uuid::Uuid;

use crate::{
    HeartRateSample, SpO2Sample,
    constants::{HEART_RATE_MEASUREMENT, SPO2_MEASUREMENT},
    error::CodecError,
};

/// A decoded notification from one of the ring's characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RingData {
    HeartRate(HeartRateSample),
    SpO2(SpO2Sample),
}

impl RingData {
    pub fn from_notification(characteristic: Uuid, payload: &[u8]) -> Result<Self, CodecError> {
        match characteristic {
            HEART_RATE_MEASUREMENT => HeartRateSample::decode(payload).map(Self::HeartRate),
            SPO2_MEASUREMENT => SpO2Sample::decode(payload).map(Self::SpO2),
            other => Err(CodecError::UnknownCharacteristic(other)),
        }
    }
}

impl fmt::Display for RingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingData::HeartRate(sample) => write!(f, "Heart Rate: {}", sample),
            RingData::SpO2(sample) => sample.fmt(f),
        }
    }
}

/// Hex rendering of a payload for log lines.
pub fn payload_hex(payload: &[u8]) -> String {
    hex::encode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_heart_rate_notifications() {
        let data = RingData::from_notification(HEART_RATE_MEASUREMENT, &[0x00, 0x48]).unwrap();
        assert_eq!(data, RingData::HeartRate(HeartRateSample { bpm: 72 }));
        assert_eq!(data.to_string(), "Heart Rate: 72 BPM");
    }

    #[test]
    fn routes_spo2_notifications() {
        let data = RingData::from_notification(SPO2_MEASUREMENT, &[0x00, 0x62]).unwrap();
        assert_eq!(data, RingData::SpO2(SpO2Sample { percentage: 98 }));
    }

    #[test]
    fn rejects_unknown_characteristic() {
        let uuid = Uuid::from_u128(1);
        assert_eq!(
            RingData::from_notification(uuid, &[0x00, 0x48]),
            Err(CodecError::UnknownCharacteristic(uuid))
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&RingData::HeartRate(HeartRateSample { bpm: 80 })).unwrap();
        assert_eq!(json, r#"{"kind":"heart_rate","bpm":80}"#);
    }

    #[test]
    fn payload_hex_is_lowercase() {
        assert_eq!(payload_hex(&[0x01, 0xAB]), "01ab");
    }
}
