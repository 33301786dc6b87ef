//! Data model and the deterministic alchemical transform.
//!
//! This crate provides:
//! - Zodiac signs, elements, bodies, lunar phases and body positions
//! - Elemental (Fire/Water/Earth/Air) and ESMS (Spirit/Essence/Matter/Substance) vectors
//! - Static dignity and ESMS weight tables
//! - [`AlchemicalTransform`]: positions → energy, elements, thermodynamic metrics
//!
//! Everything here is pure computation with numeric fallbacks in place of
//! error paths.

pub mod body;
pub mod element;
pub mod energy;
pub mod error;
pub mod lunar;
pub mod position;
pub mod tables;
pub mod thermo;
pub mod transform;
pub mod zodiac;

pub use body::{ALL_BODIES, Body, CLASSICAL_BODIES};
pub use element::{ALL_ELEMENTS, Element, ElementalVector, NORMALIZATION_EPSILON};
pub use energy::EnergyVector;
pub use error::CoreError;
pub use lunar::{ALL_LUNAR_PHASES, LunarPhase};
pub use position::{Position, PositionMap};
pub use tables::{
    DIGNITY_FLOOR, DIGNITY_STEP, DignityTable, STANDARD_DIGNITIES, STANDARD_ESMS,
    TransformTables, dignity_multiplier,
};
pub use thermo::{
    NEUTRAL_CONSTANT, ThermodynamicMetrics, derive_metrics, geometric_mean, kalchm, monica,
};
pub use transform::{AlchemicalTransform, TransformOutput};
pub use zodiac::{ALL_SIGNS, SignSplit, ZodiacSign, sign_from_longitude};
