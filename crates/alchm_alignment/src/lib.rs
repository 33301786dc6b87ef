//! The current-alignment calculator.
//!
//! [`AlignmentCalculator`] turns wall-clock time and positions from a
//! [`alchm_ephemeris::PositionChain`] into an [`Alignment`] snapshot: sun
//! sign, lunar phase, dominant bodies, elemental balance, aspects, symbolic
//! associations and a chakra distribution. The latest snapshot lives in a
//! single TTL slot; [`AlignmentRefresher`] keeps it warm from a background
//! thread.

pub mod alignment;
pub mod aspects;
pub mod calculator;
pub mod chakra;
pub mod dominant;
pub mod error;
pub mod lunar;
pub mod refresher;
pub mod symbolic;
pub mod tables;

pub use alignment::{Alignment, AlignmentFingerprint, FALLBACK_BODY_WEIGHT, FALLBACK_SOURCE};
pub use aspects::{ALL_ASPECT_KINDS, Aspect, AspectKind, calculate_aspects, separation};
pub use calculator::{
    AlignmentCalculator, CalculatorConfig, CalculatorStats, DEFAULT_ALIGNMENT_TTL_SECS,
};
pub use chakra::{ALL_CHAKRAS, CHAKRA_WEIGHTS, Chakra, ChakraDistribution, calculate_chakra_distribution};
pub use dominant::{DominantBody, calculate_dominant_bodies, calculate_elemental_balance};
pub use error::AlignmentError;
pub use lunar::{
    DEFAULT_NEW_MOON_EPOCH_UNIX, DEFAULT_SYNODIC_PERIOD_DAYS, LunarModel,
    illumination_from_fraction, phase_from_fraction,
};
pub use refresher::{AlignmentRefresher, DEFAULT_REFRESH_INTERVAL_SECS};
pub use symbolic::{BodyCard, SymbolicAssociations, calculate_symbolic_associations};
pub use tables::{
    ALL_SUITS, AlignmentTables, DECANS, DayWindow, DecanWindow, FALLBACK_SIGN, HOUR_RULERS,
    MinorCard, Suit, WEEKDAY_RULERS, ZODIAC_RANGES,
};
