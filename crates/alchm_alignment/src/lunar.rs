//! Mean lunar phase from a reference new moon.
//!
//! The phase fraction is the position within the current synodic cycle:
//! `((t - epoch) mod period) / period`, using a Euclidean remainder so
//! instants before the epoch still land in `[0, 1)`.

use std::f64::consts::TAU;

use alchm_core::LunarPhase;
use alchm_time::{Timestamp, days_between};
use chrono::{TimeZone, Utc};

use crate::error::AlignmentError;

/// Mean synodic month in days, rounded the way the phase thresholds expect.
pub const DEFAULT_SYNODIC_PERIOD_DAYS: f64 = 29.53;

/// Reference new moon, 2023-01-21 20:53 UTC, as Unix seconds.
pub const DEFAULT_NEW_MOON_EPOCH_UNIX: i64 = 1_674_334_380;

/// New moon covers fractions below `NEW_MOON_START` or above `NEW_MOON_END`.
const NEW_MOON_START: f64 = 0.03;
const NEW_MOON_END: f64 = 0.97;

/// Exclusive upper bounds of the phases between the two new-moon edges, in
/// cycle order. Anything past the last bound up to the closing new-moon edge
/// is waning crescent.
const PHASE_BOUNDS: [(f64, LunarPhase); 6] = [
    (0.25, LunarPhase::WaxingCrescent),
    (0.28, LunarPhase::FirstQuarter),
    (0.47, LunarPhase::WaxingGibbous),
    (0.53, LunarPhase::FullMoon),
    (0.72, LunarPhase::WaningGibbous),
    (0.78, LunarPhase::LastQuarter),
];

/// Phase name for a cycle fraction in `[0, 1)`.
pub fn phase_from_fraction(fraction: f64) -> LunarPhase {
    if fraction < NEW_MOON_START || fraction > NEW_MOON_END {
        return LunarPhase::NewMoon;
    }
    PHASE_BOUNDS
        .iter()
        .find(|(bound, _)| fraction < *bound)
        .map(|(_, phase)| *phase)
        .unwrap_or(LunarPhase::WaningCrescent)
}

/// Illuminated fraction for a cycle fraction, `0.5 * (1 - cos 2πp)`.
pub fn illumination_from_fraction(fraction: f64) -> f64 {
    0.5 * (1.0 - (TAU * fraction).cos())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarModel {
    epoch: Timestamp,
    period_days: f64,
}

impl Default for LunarModel {
    fn default() -> Self {
        let epoch = Utc
            .timestamp_opt(DEFAULT_NEW_MOON_EPOCH_UNIX, 0)
            .single()
            .unwrap_or_default();
        Self {
            epoch,
            period_days: DEFAULT_SYNODIC_PERIOD_DAYS,
        }
    }
}

impl LunarModel {
    pub fn new(epoch: Timestamp, period_days: f64) -> Result<Self, AlignmentError> {
        if !period_days.is_finite() || period_days <= 0.0 {
            return Err(AlignmentError::InvalidConfig(format!(
                "synodic period must be positive, got {period_days}"
            )));
        }
        Ok(Self { epoch, period_days })
    }

    pub fn epoch(&self) -> Timestamp {
        self.epoch
    }

    pub fn period_days(&self) -> f64 {
        self.period_days
    }

    /// Position in the synodic cycle, `[0, 1)`.
    pub fn phase_fraction(&self, at: Timestamp) -> f64 {
        let days = days_between(self.epoch, at);
        let p = days.rem_euclid(self.period_days) / self.period_days;
        // rem_euclid can round up to exactly `period` for tiny negatives.
        if p >= 1.0 { 0.0 } else { p }
    }

    pub fn phase(&self, at: Timestamp) -> LunarPhase {
        phase_from_fraction(self.phase_fraction(at))
    }

    pub fn illumination(&self, at: Timestamp) -> f64 {
        illumination_from_fraction(self.phase_fraction(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn days(d: f64) -> Duration {
        Duration::milliseconds((d * 86_400_000.0).round() as i64)
    }

    #[test]
    fn epoch_is_new_moon() {
        let m = LunarModel::default();
        assert_eq!(m.phase(m.epoch()), LunarPhase::NewMoon);
        assert!(m.illumination(m.epoch()) < 1e-12);
    }

    #[test]
    fn half_cycle_is_full_moon() {
        let m = LunarModel::default();
        let t = m.epoch() + days(14.76);
        assert_eq!(m.phase(t), LunarPhase::FullMoon);
        assert!(m.illumination(t) > 0.99);
    }

    #[test]
    fn before_epoch_wraps() {
        let m = LunarModel::default();
        // One day before a new moon is late waning crescent territory.
        let p = m.phase_fraction(m.epoch() - days(1.0));
        assert!(p > 0.96 && p < 1.0, "p={p}");
        assert_eq!(m.phase(m.epoch() - days(0.5)), LunarPhase::NewMoon);
        assert_eq!(m.phase(m.epoch() - days(3.0)), LunarPhase::WaningCrescent);
    }

    #[test]
    fn threshold_edges() {
        assert_eq!(phase_from_fraction(0.0), LunarPhase::NewMoon);
        assert_eq!(phase_from_fraction(0.03), LunarPhase::WaxingCrescent);
        assert_eq!(phase_from_fraction(0.25), LunarPhase::FirstQuarter);
        assert_eq!(phase_from_fraction(0.28), LunarPhase::WaxingGibbous);
        assert_eq!(phase_from_fraction(0.5), LunarPhase::FullMoon);
        assert_eq!(phase_from_fraction(0.6), LunarPhase::WaningGibbous);
        assert_eq!(phase_from_fraction(0.75), LunarPhase::LastQuarter);
        assert_eq!(phase_from_fraction(0.9), LunarPhase::WaningCrescent);
        assert_eq!(phase_from_fraction(0.97), LunarPhase::WaningCrescent);
        assert_eq!(phase_from_fraction(0.9700001), LunarPhase::NewMoon);
        assert_eq!(phase_from_fraction(0.99), LunarPhase::NewMoon);
    }

    #[test]
    fn rejects_bad_period() {
        let m = LunarModel::default();
        assert!(LunarModel::new(m.epoch(), 0.0).is_err());
        assert!(LunarModel::new(m.epoch(), f64::NAN).is_err());
    }
}
