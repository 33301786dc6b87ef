//! Error types for the scorer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("invalid scorer config: {0}")]
    InvalidConfig(&'static str),
}
