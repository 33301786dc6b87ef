//! Time handling for the alchm pipeline.
//!
//! This crate provides:
//! - The [`Clock`] seam: [`SystemClock`] for production, [`ManualClock`]
//!   for tests that need to move time forward without sleeping
//! - Calendar helpers: days since J2000, 0-based month/day/weekday/hour
//!   extraction, and the four meteorological [`Season`]s

pub mod calendar;
pub mod clock;
pub mod error;

pub use calendar::{
    ALL_SEASONS, CalendarParts, J2000_UTC, SECONDS_PER_DAY, Season, days_between, days_since_j2000,
    parse_timestamp, season_from_month0,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TimeError;

/// UTC timestamp type used throughout the workspace.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
