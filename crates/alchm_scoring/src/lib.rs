//! Compatibility scoring of recipes and ingredients against an alignment.
//!
//! `total = 0.3*elemental + 0.2*zodiacal + 0.15*lunar + 0.25*planetary +
//! 0.1*seasonal`, every sub-score in `[0, 1]`. Scores are cached per
//! `(item id, alignment fingerprint)` in a bounded [`ScoreCache`].

pub mod cache;
pub mod error;
pub mod item;
pub mod score;
pub mod scorer;

pub use cache::{
    CacheKey, CacheStats, DEFAULT_CACHE_CAPACITY, DEFAULT_SCORE_TTL_SECS, ScoreCache,
    ScoreCacheEntry,
};
pub use error::ScoringError;
pub use item::{ALL_SEASONS_SENTINEL, ScoringItem, Seasonality};
pub use score::{
    ELEMENTAL_WEIGHT, LUNAR_WEIGHT, NEUTRAL_SCORE, PLANETARY_WEIGHT, SEASONAL_WEIGHT,
    ScoreBreakdown, ZODIACAL_WEIGHT, current_season, score_item,
};
pub use scorer::{CompatibilityScorer, IngredientSetScore, ScoredItem, ScorerConfig};
