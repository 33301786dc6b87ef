//! Position sources for the alignment pipeline.
//!
//! A [`PositionChain`] tries each configured [`PositionSource`] in order and
//! always ends with the built-in static table, so callers get a position map
//! no matter which upstream is down.

pub mod breaker;
pub mod chain;
pub mod error;
pub mod mean_elements;
pub mod snapshot;
pub mod source;
pub mod static_table;

pub use breaker::{BreakerState, BreakerStatus, CircuitBreaker};
pub use chain::{
    DEFAULT_BREAKER_COOLDOWN_SECS, DEFAULT_BREAKER_THRESHOLD, FetchOutcome, PositionChain,
    SourceFailure, SourceStatus,
};
pub use error::SourceError;
pub use mean_elements::{MeanElementsSource, mean_geocentric_longitude};
pub use snapshot::{SnapshotFileSource, parse_snapshot};
pub use source::{FnSource, GeoLocation, PositionSource};
pub use static_table::{STATIC_POSITIONS, StaticPositionSource};
