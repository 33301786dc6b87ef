//! Error types for calendar handling.

use thiserror::Error;

/// Errors from calendar parsing and validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Season name not recognised.
    #[error("unknown season: {0}")]
    UnknownSeason(String),
    /// Month/day pair outside the calendar.
    #[error("invalid calendar date: month0={month0}, day={day}")]
    InvalidCalendarDate { month0: u32, day: u32 },
    /// Timestamp string could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
