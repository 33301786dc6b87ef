//! Ordered position-source chain.
//!
//! Sources are tried in order; the first one returning a non-empty map wins.
//! Each source sits behind its own [`CircuitBreaker`] driven by the injected
//! clock. The static table is always consulted last, so [`PositionChain::fetch`]
//! cannot fail.

use std::fmt;
use std::sync::Arc;

use alchm_core::PositionMap;
use alchm_time::{Clock, Timestamp};
use chrono::Duration;
use serde::Serialize;

use crate::breaker::{BreakerStatus, CircuitBreaker};
use crate::error::SourceError;
use crate::source::{GeoLocation, PositionSource};
use crate::static_table::StaticPositionSource;

pub const DEFAULT_BREAKER_THRESHOLD: u32 = 3;
pub const DEFAULT_BREAKER_COOLDOWN_SECS: i64 = 60;

/// A source that was tried (or skipped) before the winning one.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

/// Result of a chain fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub positions: PositionMap,
    /// Name of the source that answered.
    pub source: String,
    /// True when an earlier source failed or was skipped.
    pub fell_back: bool,
    pub failures: Vec<SourceFailure>,
}

/// Per-source breaker state, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStatus {
    pub source: String,
    pub breaker: BreakerStatus,
}

struct ChainEntry {
    source: Box<dyn PositionSource>,
    breaker: CircuitBreaker,
}

pub struct PositionChain {
    clock: Arc<dyn Clock>,
    entries: Vec<ChainEntry>,
    breaker_threshold: u32,
    breaker_cooldown: Duration,
}

impl PositionChain {
    /// Empty chain: every fetch answers from the static table.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Vec::new(),
            breaker_threshold: DEFAULT_BREAKER_THRESHOLD,
            breaker_cooldown: Duration::seconds(DEFAULT_BREAKER_COOLDOWN_SECS),
        }
    }

    /// Breaker settings for sources added after this call.
    pub fn with_breaker(mut self, threshold: u32, cooldown: Duration) -> Self {
        self.breaker_threshold = threshold;
        self.breaker_cooldown = cooldown;
        self
    }

    /// Append a source after the ones already present.
    pub fn with_source(mut self, source: impl PositionSource + 'static) -> Self {
        self.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn PositionSource>) {
        self.entries.push(ChainEntry {
            source,
            breaker: CircuitBreaker::new(self.breaker_threshold, self.breaker_cooldown),
        });
    }

    /// Names in try order, static table included.
    pub fn source_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.source.name().to_string())
            .chain(std::iter::once(StaticPositionSource::NAME.to_string()))
            .collect()
    }

    pub fn source_statuses(&self) -> Vec<SourceStatus> {
        let now = self.clock.now();
        self.entries
            .iter()
            .map(|e| SourceStatus {
                source: e.source.name().to_string(),
                breaker: e.breaker.status(now),
            })
            .collect()
    }

    pub fn fetch(&self, at: Timestamp, location: Option<&GeoLocation>) -> FetchOutcome {
        let mut failures = Vec::new();

        for entry in &self.entries {
            let name = entry.source.name();
            if !entry.breaker.allows(self.clock.now()) {
                tracing::debug!(source = name, "circuit open, skipping");
                failures.push(SourceFailure {
                    source: name.to_string(),
                    error: SourceError::CircuitOpen(name.to_string()),
                });
                continue;
            }

            let result = entry.source.positions(at, location).and_then(|map| {
                if map.is_empty() {
                    Err(SourceError::Empty)
                } else {
                    Ok(map)
                }
            });

            match result {
                Ok(positions) => {
                    entry.breaker.record_success();
                    tracing::debug!(source = name, bodies = positions.len(), "positions fetched");
                    return FetchOutcome {
                        positions,
                        source: name.to_string(),
                        fell_back: !failures.is_empty(),
                        failures,
                    };
                }
                Err(error) => {
                    tracing::warn!(source = name, %error, "position source failed");
                    if entry.breaker.record_failure(self.clock.now()) {
                        tracing::warn!(
                            source = name,
                            threshold = entry.breaker.threshold(),
                            cooldown_secs = entry.breaker.cooldown().num_seconds(),
                            "circuit breaker opened"
                        );
                    }
                    failures.push(SourceFailure {
                        source: name.to_string(),
                        error,
                    });
                }
            }
        }

        if !failures.is_empty() {
            tracing::warn!(
                failed = failures.len(),
                "all position sources failed, using static table"
            );
        }
        FetchOutcome {
            positions: StaticPositionSource::table(),
            source: StaticPositionSource::NAME.to_string(),
            fell_back: !failures.is_empty(),
            failures,
        }
    }
}

impl fmt::Debug for PositionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionChain")
            .field("sources", &self.source_names())
            .field("breaker_threshold", &self.breaker_threshold)
            .field("breaker_cooldown", &self.breaker_cooldown)
            .finish()
    }
}
