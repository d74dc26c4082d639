use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("frame too short: {len} byte(s), need at least 2")]
    InvalidFrame { len: usize },
    #[error("no decoder for characteristic {0}")]
    UnknownCharacteristic(Uuid),
}
