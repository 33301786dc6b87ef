//! Configuration for the alchm pipeline.
//!
//! Values come from, in increasing precedence: built-in defaults, an
//! optional JSON file, and `ALCHM_*` environment variables. A malformed
//! environment value is logged and ignored; a malformed file is an error.
//!
//! ```json
//! {
//!   "alignment": { "ttl_secs": 3600, "refresh_interval_secs": 300 },
//!   "scoring": { "cache_capacity": 8192 },
//!   "positions": { "snapshot_path": "/var/lib/alchm/positions.json" },
//!   "log_filter": "info,alchm_scoring=debug"
//! }
//! ```

pub mod error;

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use alchm_alignment::{
    CalculatorConfig, DEFAULT_ALIGNMENT_TTL_SECS, DEFAULT_REFRESH_INTERVAL_SECS,
    DEFAULT_SYNODIC_PERIOD_DAYS, LunarModel,
};
use alchm_ephemeris::{
    DEFAULT_BREAKER_COOLDOWN_SECS, DEFAULT_BREAKER_THRESHOLD, GeoLocation, MeanElementsSource,
    PositionChain, SnapshotFileSource,
};
use alchm_scoring::{DEFAULT_CACHE_CAPACITY, DEFAULT_SCORE_TTL_SECS, ScorerConfig};
use alchm_time::{Clock, Timestamp};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use error::ConfigError;

/// Default `tracing` filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "ALCHM_";

/// Longest span, in seconds, a `chrono::Duration` can hold.
pub const MAX_DURATION_SECS: u64 = (i64::MAX / 1000) as u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentSection {
    pub ttl_secs: u64,
    pub refresh_interval_secs: u64,
    /// Reference new moon, RFC 3339.
    pub lunar_epoch: Timestamp,
    pub synodic_period_days: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for AlignmentSection {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_ALIGNMENT_TTL_SECS as u64,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            lunar_epoch: LunarModel::default().epoch(),
            synodic_period_days: DEFAULT_SYNODIC_PERIOD_DAYS,
            latitude: None,
            longitude: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    pub ttl_secs: u64,
    pub cache_capacity: usize,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SCORE_TTL_SECS as u64,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionsSection {
    /// Primary source: JSON snapshot file, re-read on every fetch.
    pub snapshot_path: Option<PathBuf>,
    /// Add the analytic mean-elements source after the snapshot.
    pub use_mean_elements: bool,
    pub breaker_threshold: u32,
    pub breaker_cooldown_secs: u64,
}

impl Default for PositionsSection {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            use_mean_elements: true,
            breaker_threshold: DEFAULT_BREAKER_THRESHOLD,
            breaker_cooldown_secs: DEFAULT_BREAKER_COOLDOWN_SECS as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub alignment: AlignmentSection,
    pub scoring: ScoringSection,
    pub positions: PositionsSection,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alignment: AlignmentSection::default(),
            scoring: ScoringSection::default(),
            positions: PositionsSection::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`] with an explicit variable lookup.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply `ALCHM_*` overrides. Unparseable values are logged and skipped.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let a = &mut self.alignment;
        override_value(&lookup, "ALCHM_ALIGNMENT_TTL_SECS", &mut a.ttl_secs);
        override_value(&lookup, "ALCHM_REFRESH_INTERVAL_SECS", &mut a.refresh_interval_secs);
        override_value(&lookup, "ALCHM_LUNAR_EPOCH", &mut a.lunar_epoch);
        override_value(&lookup, "ALCHM_SYNODIC_PERIOD_DAYS", &mut a.synodic_period_days);
        override_optional(&lookup, "ALCHM_LATITUDE", &mut a.latitude);
        override_optional(&lookup, "ALCHM_LONGITUDE", &mut a.longitude);

        let s = &mut self.scoring;
        override_value(&lookup, "ALCHM_SCORE_TTL_SECS", &mut s.ttl_secs);
        override_value(&lookup, "ALCHM_CACHE_CAPACITY", &mut s.cache_capacity);

        let p = &mut self.positions;
        override_optional(&lookup, "ALCHM_SNAPSHOT_PATH", &mut p.snapshot_path);
        override_value(&lookup, "ALCHM_USE_MEAN_ELEMENTS", &mut p.use_mean_elements);
        override_value(&lookup, "ALCHM_BREAKER_THRESHOLD", &mut p.breaker_threshold);
        override_value(&lookup, "ALCHM_BREAKER_COOLDOWN_SECS", &mut p.breaker_cooldown_secs);

        override_value(&lookup, "ALCHM_LOG", &mut self.log_filter);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.alignment;
        if a.ttl_secs == 0 {
            return invalid("alignment.ttl_secs must be greater than zero");
        }
        if a.ttl_secs > MAX_DURATION_SECS {
            return invalid("alignment.ttl_secs is too large");
        }
        if a.refresh_interval_secs == 0 {
            return invalid("alignment.refresh_interval_secs must be greater than zero");
        }
        if !a.synodic_period_days.is_finite() || a.synodic_period_days <= 0.0 {
            return invalid("alignment.synodic_period_days must be positive");
        }
        match (a.latitude, a.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return invalid("alignment location out of range");
                }
            }
            (None, None) => {}
            _ => return invalid("alignment.latitude and alignment.longitude must be set together"),
        }
        if self.scoring.ttl_secs == 0 {
            return invalid("scoring.ttl_secs must be greater than zero");
        }
        if self.scoring.ttl_secs > MAX_DURATION_SECS {
            return invalid("scoring.ttl_secs is too large");
        }
        if self.scoring.cache_capacity == 0 {
            return invalid("scoring.cache_capacity must be greater than zero");
        }
        if self.positions.breaker_threshold == 0 {
            return invalid("positions.breaker_threshold must be greater than zero");
        }
        if self.positions.breaker_cooldown_secs > MAX_DURATION_SECS {
            return invalid("positions.breaker_cooldown_secs is too large");
        }
        Ok(())
    }

    pub fn location(&self) -> Option<GeoLocation> {
        match (self.alignment.latitude, self.alignment.longitude) {
            (Some(lat), Some(lon)) => Some(GeoLocation::new(lat, lon)),
            _ => None,
        }
    }

    pub fn calculator_config(&self) -> CalculatorConfig {
        CalculatorConfig {
            ttl: secs(self.alignment.ttl_secs),
            lunar_epoch: self.alignment.lunar_epoch,
            synodic_period_days: self.alignment.synodic_period_days,
            location: self.location(),
        }
    }

    pub fn scorer_config(&self) -> ScorerConfig {
        ScorerConfig {
            ttl: secs(self.scoring.ttl_secs),
            cache_capacity: self.scoring.cache_capacity,
        }
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.alignment.refresh_interval_secs)
    }

    /// Position chain: snapshot file, then mean elements, then the static
    /// table.
    pub fn build_chain(&self, clock: Arc<dyn Clock>) -> PositionChain {
        let p = &self.positions;
        let mut chain =
            PositionChain::new(clock).with_breaker(p.breaker_threshold, secs(p.breaker_cooldown_secs));
        if let Some(path) = &p.snapshot_path {
            chain = chain.with_source(SnapshotFileSource::new(path.clone()));
        }
        if p.use_mean_elements {
            chain = chain.with_source(MeanElementsSource);
        }
        chain
    }
}

fn invalid(msg: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.to_string()))
}

/// Seconds as a `Duration`, saturating at [`MAX_DURATION_SECS`].
fn secs(s: u64) -> Duration {
    i64::try_from(s.min(MAX_DURATION_SECS))
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

fn override_value<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else { return };
    match raw.trim().parse() {
        Ok(value) => {
            info!("{key} set from environment");
            *slot = value;
        }
        Err(e) => warn!("Invalid {key} value {raw:?}: {e}, keeping current setting"),
    }
}

fn override_optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut Option<T>)
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else { return };
    if raw.trim().is_empty() {
        info!("{key} empty in environment, clearing");
        *slot = None;
        return;
    }
    match raw.trim().parse() {
        Ok(value) => {
            info!("{key} set from environment");
            *slot = Some(value);
        }
        Err(e) => warn!("Invalid {key} value {raw:?}: {e}, keeping current setting"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let c = Config::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.alignment.ttl_secs, 3600);
        assert_eq!(c.alignment.refresh_interval_secs, 300);
        assert_eq!(c.scoring.ttl_secs, 1800);
        assert_eq!(c.scoring.cache_capacity, 4096);
        assert_eq!(c.positions.breaker_threshold, 3);
        assert!(c.positions.use_mean_elements);
        assert_eq!(c.log_filter, "info");
    }

    #[test]
    fn env_overrides_and_bad_values_are_ignored() {
        let mut c = Config::default();
        c.apply_env(env(&[
            ("ALCHM_CACHE_CAPACITY", "128"),
            ("ALCHM_SCORE_TTL_SECS", "not-a-number"),
            ("ALCHM_USE_MEAN_ELEMENTS", "false"),
            ("ALCHM_LATITUDE", "51.5"),
            ("ALCHM_LONGITUDE", "-0.12"),
            ("ALCHM_LUNAR_EPOCH", "2024-01-11T11:57:00Z"),
        ]));
        assert_eq!(c.scoring.cache_capacity, 128);
        assert_eq!(c.scoring.ttl_secs, 1800);
        assert!(!c.positions.use_mean_elements);
        assert_eq!(c.location(), Some(GeoLocation::new(51.5, -0.12)));
        assert_eq!(c.alignment.lunar_epoch.timestamp(), 1_704_974_220);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut c = Config::default();
        c.scoring.cache_capacity = 0;
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));

        let mut c = Config::default();
        c.alignment.synodic_period_days = -1.0;
        assert!(c.validate().is_err());

        let mut c = Config::default();
        c.alignment.refresh_interval_secs = 0;
        assert!(c.validate().is_err());

        let mut c = Config::default();
        c.alignment.latitude = Some(10.0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn load_with_rejects_invalid_env_result() {
        let r = Config::load_with(None, env(&[("ALCHM_CACHE_CAPACITY", "0")]));
        assert!(matches!(r, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn oversized_spans_are_rejected_and_saturate() {
        let mut c = Config::default();
        c.alignment.ttl_secs = MAX_DURATION_SECS + 1;
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));

        let mut c = Config::default();
        c.positions.breaker_cooldown_secs = u64::MAX;
        assert!(c.validate().is_err());

        c.scoring.ttl_secs = u64::MAX;
        assert_eq!(c.scorer_config().ttl, Duration::seconds(MAX_DURATION_SECS as i64));

        let mut c = Config::default();
        c.alignment.ttl_secs = MAX_DURATION_SECS;
        assert!(c.validate().is_ok());
        assert_eq!(c.calculator_config().ttl.num_seconds(), MAX_DURATION_SECS as i64);
    }

    #[test]
    fn converts_to_component_configs() {
        let c = Config::default();
        assert_eq!(c.calculator_config().ttl, Duration::hours(1));
        assert_eq!(c.scorer_config().ttl, Duration::minutes(30));
        assert_eq!(c.refresh_interval(), std::time::Duration::from_secs(300));
    }
}
