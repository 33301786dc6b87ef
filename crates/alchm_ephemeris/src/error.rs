//! Error types for position sources.

use thiserror::Error;

/// Why a position source could not answer.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// Source is not reachable or not configured.
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(String),
    /// Source answered with data that could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
    /// Source answered with no bodies.
    #[error("source returned no positions")]
    Empty,
    /// Source skipped because its circuit breaker is open.
    #[error("circuit open for source {0}")]
    CircuitOpen(String),
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
