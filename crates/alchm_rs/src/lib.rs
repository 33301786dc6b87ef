//! Convenience facade for the alchm pipeline.
//!
//! [`Recommender`] wires a position chain, an [`AlignmentCalculator`] and a
//! [`CompatibilityScorer`] from a single [`Config`], and exposes the two
//! cache tiers (alignment slot and score cache) as one unit.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use alchm_rs::*;
//!
//! let config = Config::load(None)?;
//! let recommender = Recommender::from_config(&config)?;
//! let alignment = recommender.current_alignment();
//! println!("{} / {}", alignment.zodiac_sign, alignment.lunar_phase);
//!
//! let items: Vec<ScoringItem> = serde_json::from_str(&json)?;
//! for scored in recommender.rank(&items) {
//!     println!("{:.3} {}", scored.score, scored.item_id);
//! }
//! ```

pub mod error;
pub mod recommender;

pub use error::RecommenderError;
pub use recommender::{CacheDiagnostics, Recommender};

// Re-export the types callers handle so they only need `use alchm_rs::*`.
pub use alchm_alignment::{
    Alignment, AlignmentCalculator, AlignmentFingerprint, AlignmentRefresher, CalculatorStats,
};
pub use alchm_config::{Config, ConfigError};
pub use alchm_core::{
    AlchemicalTransform, Body, ElementalVector, EnergyVector, LunarPhase, Position, PositionMap,
    ThermodynamicMetrics, TransformOutput, ZodiacSign,
};
pub use alchm_ephemeris::{FetchOutcome, GeoLocation, PositionChain, SourceStatus};
pub use alchm_scoring::{
    CacheStats, CompatibilityScorer, IngredientSetScore, ScoreBreakdown, ScoredItem, ScoringItem,
    Seasonality,
};
pub use alchm_time::{Clock, ManualClock, SystemClock, Timestamp};

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time assertion: one recommender serves every request thread.
    #[allow(dead_code)]
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<Recommender>();
        }
    };
}
