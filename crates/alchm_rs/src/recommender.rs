//! The [`Recommender`] facade.

use std::sync::Arc;

use alchm_alignment::{Alignment, AlignmentCalculator, AlignmentRefresher, CalculatorStats};
use alchm_config::Config;
use alchm_ephemeris::{PositionChain, SourceStatus};
use alchm_scoring::{CompatibilityScorer, IngredientSetScore, ScoredItem, ScoringItem};
use alchm_time::{Clock, SystemClock};
use serde::Serialize;
use tracing::info;

use crate::error::RecommenderError;

/// Snapshot of both cache tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDiagnostics {
    /// Live score-cache entries.
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    /// Seconds since the slotted alignment was computed; `None` when empty.
    pub alignment_age_secs: Option<i64>,
    pub alignment_fingerprint: Option<String>,
    pub alignment_source: Option<String>,
    pub score_computations: u64,
    pub calculator: CalculatorStats,
    pub sources: Vec<SourceStatus>,
}

/// Alignment calculator plus compatibility scorer behind one handle.
pub struct Recommender {
    clock: Arc<dyn Clock>,
    calculator: Arc<AlignmentCalculator>,
    scorer: CompatibilityScorer,
    refresh_interval: std::time::Duration,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("calculator", &self.calculator)
            .field("scorer", &self.scorer)
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}

impl Recommender {
    /// Build on the system clock.
    pub fn from_config(config: &Config) -> Result<Self, RecommenderError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build on an injected clock.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, RecommenderError> {
        config.validate()?;
        let chain = Arc::new(config.build_chain(Arc::clone(&clock)));
        info!(sources = ?chain.source_names(), "position chain configured");
        let calculator =
            AlignmentCalculator::new(config.calculator_config(), Arc::clone(&clock), chain)?;
        let scorer = CompatibilityScorer::new(config.scorer_config(), Arc::clone(&clock))?;
        Ok(Self::from_parts(
            clock,
            Arc::new(calculator),
            scorer,
            config.refresh_interval(),
        ))
    }

    /// Assemble from prebuilt components.
    pub fn from_parts(
        clock: Arc<dyn Clock>,
        calculator: Arc<AlignmentCalculator>,
        scorer: CompatibilityScorer,
        refresh_interval: std::time::Duration,
    ) -> Self {
        Self {
            clock,
            calculator,
            scorer,
            refresh_interval,
        }
    }

    pub fn calculator(&self) -> &Arc<AlignmentCalculator> {
        &self.calculator
    }

    pub fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    pub fn chain(&self) -> &PositionChain {
        self.calculator.chain()
    }

    /// Current alignment, from the slot while it is fresh.
    pub fn current_alignment(&self) -> Arc<Alignment> {
        self.calculator.current_alignment(false)
    }

    /// Score one item against the current alignment.
    pub fn score(&self, item: &ScoringItem) -> ScoredItem {
        let alignment = self.current_alignment();
        self.scorer.score(item, &alignment)
    }

    /// Score every item against the current alignment, best first.
    pub fn rank(&self, items: &[ScoringItem]) -> Vec<ScoredItem> {
        let alignment = self.current_alignment();
        self.scorer.rank(items, &alignment)
    }

    pub fn score_ingredient_set(&self, ingredients: &[ScoringItem]) -> IngredientSetScore {
        let alignment = self.current_alignment();
        self.scorer.score_ingredient_set(ingredients, &alignment)
    }

    /// Drop every cached score, then recompute the alignment.
    pub fn force_refresh(&self) -> Arc<Alignment> {
        let dropped = self.scorer.cache().len();
        self.scorer.invalidate_all();
        let alignment = self.calculator.current_alignment(true);
        info!(
            dropped_scores = dropped,
            fingerprint = %alignment.fingerprint,
            "forced refresh"
        );
        alignment
    }

    /// Drop cached scores keyed to any fingerprint other than the current
    /// alignment's. Returns how many were removed.
    pub fn prune_stale_scores(&self) -> usize {
        let alignment = self.current_alignment();
        self.scorer.cache().retain_fingerprint(&alignment.fingerprint)
    }

    pub fn diagnostics(&self) -> CacheDiagnostics {
        let stats = self.scorer.cache_stats();
        let slotted = self.calculator.cached();
        let now = self.clock.now();
        CacheDiagnostics {
            size: stats.size,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate,
            alignment_age_secs: slotted.as_ref().map(|a| a.age_secs(now)),
            alignment_fingerprint: slotted.as_ref().map(|a| a.fingerprint.to_string()),
            alignment_source: slotted.as_ref().map(|a| a.position_source.clone()),
            score_computations: self.scorer.computations(),
            calculator: self.calculator.stats(),
            sources: self.calculator.chain().source_statuses(),
        }
    }

    /// Keep the alignment slot warm from a background thread at the
    /// configured interval.
    pub fn start_background_refresh(&self) -> Result<AlignmentRefresher, RecommenderError> {
        let refresher =
            AlignmentRefresher::spawn(Arc::clone(&self.calculator), self.refresh_interval)?;
        Ok(refresher)
    }
}
