//! Error types for the alignment calculator.

use thiserror::Error;

/// Internal failures while computing an alignment.
///
/// Never returned from `current_alignment`; a failure there degrades to the
/// fallback alignment. Surfaces only from configuration validation and the
/// table lookups exposed for direct use.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AlignmentError {
    /// No calendar window covers the given month/day.
    #[error("no zodiac range covers month0={month0} day={day}")]
    ZodiacTableMiss { month0: u32, day: u32 },
    /// A derived quantity was NaN, infinite or not normalized.
    #[error("degenerate {0}")]
    Degenerate(&'static str),
    #[error("invalid calculator config: {0}")]
    InvalidConfig(String),
}
