//! Compatibility scorer.

use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use alchm_alignment::{Alignment, AlignmentFingerprint};
use alchm_core::{AlchemicalTransform, geometric_mean};
use alchm_time::Clock;
use chrono::Duration;
use serde::Serialize;
use tracing::debug;

use crate::cache::{
    CacheKey, CacheStats, DEFAULT_CACHE_CAPACITY, DEFAULT_SCORE_TTL_SECS, ScoreCache,
};
use crate::error::ScoringError;
use crate::item::ScoringItem;
use crate::score::{ScoreBreakdown, score_item};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorerConfig {
    pub ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(DEFAULT_SCORE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.ttl <= Duration::zero() {
            return Err(ScoringError::InvalidConfig("ttl must be greater than zero"));
        }
        if self.cache_capacity == 0 {
            return Err(ScoringError::InvalidConfig(
                "cache_capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    pub item_id: String,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Served from the cache rather than computed.
    pub cached: bool,
    pub fingerprint: AlignmentFingerprint,
}

/// Collective result for a set of ingredients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSetScore {
    /// Geometric mean of member Kalchm over members with energy data.
    pub kalchm: f64,
    /// Members that had energy data.
    pub contributing: usize,
    pub members: Vec<ScoredItem>,
    /// Arithmetic mean of member scores, 0.5 for an empty set.
    pub mean_score: f64,
}

/// Scores items against an alignment, caching by `(item id, fingerprint)`.
pub struct CompatibilityScorer {
    clock: Arc<dyn Clock>,
    transform: AlchemicalTransform,
    cache: ScoreCache,
    computations: AtomicU64,
}

impl std::fmt::Debug for CompatibilityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatibilityScorer")
            .field("cache", &self.cache.stats())
            .field("computations", &self.computations())
            .finish()
    }
}

impl CompatibilityScorer {
    pub fn new(config: ScorerConfig, clock: Arc<dyn Clock>) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            clock,
            transform: AlchemicalTransform::default(),
            cache: ScoreCache::new(config.ttl, config.cache_capacity),
            computations: AtomicU64::new(0),
        })
    }

    pub fn with_transform(mut self, transform: AlchemicalTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    /// Scores actually computed (cache misses).
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Score one item, from the cache when possible.
    pub fn score(&self, item: &ScoringItem, alignment: &Alignment) -> ScoredItem {
        let now = self.clock.now();
        let key = CacheKey::new(item.id.clone(), alignment.fingerprint.clone());

        if let Some(entry) = self.cache.get(&key, now) {
            debug!(item = %item.id, "score cache hit");
            return ScoredItem {
                item_id: item.id.clone(),
                score: entry.score,
                breakdown: entry.breakdown,
                cached: true,
                fingerprint: entry.fingerprint,
            };
        }

        let breakdown = score_item(item, alignment);
        self.computations.fetch_add(1, Ordering::Relaxed);
        debug!(item = %item.id, score = breakdown.total, "score computed");
        self.cache.set(key, breakdown.total, breakdown, now);

        ScoredItem {
            item_id: item.id.clone(),
            score: breakdown.total,
            breakdown,
            cached: false,
            fingerprint: alignment.fingerprint.clone(),
        }
    }

    /// Score every item, best first. Ties keep id order.
    pub fn rank(&self, items: &[ScoringItem], alignment: &Alignment) -> Vec<ScoredItem> {
        let mut scored: Vec<ScoredItem> = items.iter().map(|i| self.score(i, alignment)).collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(CmpOrdering::Equal)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        scored
    }

    /// Kalchm of each member from its stored energy, combined by geometric
    /// mean, plus per-member scores.
    pub fn score_ingredient_set(
        &self,
        ingredients: &[ScoringItem],
        alignment: &Alignment,
    ) -> IngredientSetScore {
        let kalchms: Vec<f64> = ingredients
            .iter()
            .filter_map(|i| i.energy.as_ref())
            .map(|e| self.transform.kalchm_for(e))
            .collect();
        let members: Vec<ScoredItem> = ingredients
            .iter()
            .map(|i| self.score(i, alignment))
            .collect();
        let mean_score = if members.is_empty() {
            crate::score::NEUTRAL_SCORE
        } else {
            members.iter().map(|m| m.score).sum::<f64>() / members.len() as f64
        };
        IngredientSetScore {
            kalchm: geometric_mean(&kalchms),
            contributing: kalchms.len(),
            members,
            mean_score,
        }
    }
}
