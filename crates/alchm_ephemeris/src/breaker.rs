//! Per-source circuit breaker.
//!
//! Counts consecutive failures; once the count reaches the threshold the
//! source is skipped until `cooldown` has elapsed on the caller's clock.
//! The first call after the cooldown is a trial: success closes the
//! breaker, failure re-opens it for another cooldown.

use alchm_time::Timestamp;
use chrono::Duration;
use parking_lot::Mutex;
use serde::Serialize;

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    /// Cooldown elapsed; next call is a trial.
    HalfOpen,
}

impl BreakerState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Snapshot of a breaker for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakerStatus {
    pub state: BreakerState,
    pub consecutive_failures: u32,
    pub total_failures: u64,
    pub opened_at: Option<Timestamp>,
}

#[derive(Debug, Default)]
struct Inner {
    consecutive_failures: u32,
    total_failures: u64,
    opened_at: Option<Timestamp>,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// A threshold of zero is treated as one.
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            cooldown,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a call may go through at `now`.
    pub fn allows(&self, now: Timestamp) -> bool {
        !matches!(self.state_at(&self.inner.lock(), now), BreakerState::Open)
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    /// Records a failure. Returns `true` when this failure opened the breaker.
    pub fn record_failure(&self, now: Timestamp) -> bool {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        inner.total_failures += 1;
        if inner.consecutive_failures >= self.threshold {
            let was_open = inner.opened_at.is_some();
            inner.opened_at = Some(now);
            // A failed half-open trial re-arms the cooldown but is not a new trip.
            !was_open
        } else {
            false
        }
    }

    pub fn status(&self, now: Timestamp) -> BreakerStatus {
        let inner = self.inner.lock();
        BreakerStatus {
            state: self.state_at(&inner, now),
            consecutive_failures: inner.consecutive_failures,
            total_failures: inner.total_failures,
            opened_at: inner.opened_at,
        }
    }

    fn state_at(&self, inner: &Inner, now: Timestamp) -> BreakerState {
        match inner.opened_at {
            None => BreakerState::Closed,
            Some(at) if now - at >= self.cooldown => BreakerState::HalfOpen,
            Some(_) => BreakerState::Open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn opens_after_threshold() {
        let b = CircuitBreaker::new(3, Duration::seconds(60));
        assert!(!b.record_failure(t0()));
        assert!(!b.record_failure(t0()));
        assert!(b.allows(t0()));
        assert!(b.record_failure(t0()));
        assert!(!b.allows(t0()));
        assert_eq!(b.status(t0()).state, BreakerState::Open);
    }

    #[test]
    fn success_resets_count() {
        let b = CircuitBreaker::new(2, Duration::seconds(60));
        b.record_failure(t0());
        b.record_success();
        b.record_failure(t0());
        assert!(b.allows(t0()));
        assert_eq!(b.status(t0()).consecutive_failures, 1);
        assert_eq!(b.status(t0()).total_failures, 2);
    }

    #[test]
    fn half_open_after_cooldown() {
        let b = CircuitBreaker::new(1, Duration::seconds(60));
        b.record_failure(t0());
        assert!(!b.allows(t0() + Duration::seconds(59)));
        let later = t0() + Duration::seconds(60);
        assert!(b.allows(later));
        assert_eq!(b.status(later).state, BreakerState::HalfOpen);

        // Failed trial re-opens without counting as a fresh trip.
        assert!(!b.record_failure(later));
        assert!(!b.allows(later + Duration::seconds(1)));

        b.record_success();
        assert_eq!(b.status(later).state, BreakerState::Closed);
    }

    #[test]
    fn zero_threshold_is_one() {
        let b = CircuitBreaker::new(0, Duration::seconds(1));
        assert_eq!(b.threshold(), 1);
    }
}
