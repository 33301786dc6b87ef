//! Error types for parsing and validating the data model.

use thiserror::Error;

/// Errors from constructing or parsing core data types.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CoreError {
    #[error("unknown zodiac sign: {0}")]
    UnknownSign(String),
    #[error("unknown body: {0}")]
    UnknownBody(String),
    #[error("unknown element: {0}")]
    UnknownElement(String),
    #[error("unknown lunar phase: {0}")]
    UnknownLunarPhase(String),
    /// Position field out of range.
    #[error("invalid position: {0}")]
    InvalidPosition(&'static str),
}
