//! Calendar helpers: elapsed days, month/day/weekday/hour extraction and
//! meteorological seasons.
//!
//! Months are 0-based (January = 0) to match the zodiac and decan tables;
//! days are 1-based; weekdays count from Sunday = 0.

use std::str::FromStr;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::Timestamp;
use crate::error::TimeError;

/// Unix seconds of J2000.0 expressed in UTC (2000-01-01T12:00:00Z).
pub const J2000_UTC: i64 = 946_728_000;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in each month of a leap year (Feb 29 is a valid calendar day).
const MAX_DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Fractional days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: Timestamp, to: Timestamp) -> f64 {
    (to - from).num_milliseconds() as f64 / (SECONDS_PER_DAY * 1000.0)
}

/// Fractional days elapsed since J2000.0.
pub fn days_since_j2000(t: Timestamp) -> f64 {
    let millis = t.timestamp_millis() - J2000_UTC * 1000;
    millis as f64 / (SECONDS_PER_DAY * 1000.0)
}

/// Parse an RFC 3339 instant (`2024-03-20T12:00:00Z`) into UTC.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimeError> {
    chrono::DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|e| TimeError::InvalidTimestamp(format!("{s:?}: {e}")))
}

/// Calendar fields the alignment tables are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarParts {
    /// 0-based month (January = 0).
    pub month0: u32,
    /// 1-based day of month.
    pub day: u32,
    /// Day of week, Sunday = 0.
    pub weekday: u32,
    /// Hour of day, 0..24.
    pub hour: u32,
}

impl CalendarParts {
    pub fn from_timestamp(t: Timestamp) -> Self {
        Self {
            month0: t.month0(),
            day: t.day(),
            weekday: t.weekday().num_days_from_sunday(),
            hour: t.hour(),
        }
    }

    /// Check that `(month0, day)` names a real calendar day.
    pub fn validate_month_day(month0: u32, day: u32) -> Result<(), TimeError> {
        match MAX_DAYS_IN_MONTH.get(month0 as usize) {
            Some(&max) if (1..=max).contains(&day) => Ok(()),
            _ => Err(TimeError::InvalidCalendarDate { month0, day }),
        }
    }
}

/// Meteorological season, three calendar months each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

pub const ALL_SEASONS: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

impl Season {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl FromStr for Season {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "autumn" | "fall" => Ok(Self::Autumn),
            "winter" => Ok(Self::Winter),
            _ => Err(TimeError::UnknownSeason(s.to_string())),
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Season for a 0-based month: Mar-May spring, Jun-Aug summer,
/// Sep-Nov autumn, Dec-Feb winter.
pub const fn season_from_month0(month0: u32) -> Season {
    match month0 {
        2..=4 => Season::Spring,
        5..=7 => Season::Summer,
        8..=10 => Season::Autumn,
        _ => Season::Winter,
    }
}
