use thiserror::Error;

use crate::detect::RecordFormat;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Location(#[from] LocationParseError),

    #[error(transparent)]
    Timestamp(#[from] TimestampParseError),

    #[error("{format} record has an invalid shape: {source}")]
    Shape {
        format: RecordFormat,
        #[source]
        source: serde_json::Error,
    },

    #[error("record matches neither format A nor format B")]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location {raw:?}: expected {expected} '/'-separated segments, got {got}")]
pub struct LocationParseError {
    pub expected: usize,
    pub got: usize,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timestamp {raw:?}: {reason}")]
pub struct TimestampParseError {
    pub raw: String,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
