//! Sub-scores and their weighted combination.
//!
//! Each sub-score lies in `[0, 1]`. A field the item does not declare
//! contributes [`NEUTRAL_SCORE`].

use alchm_alignment::Alignment;
use alchm_core::{Body, ElementalVector, LunarPhase, ZodiacSign};
use alchm_time::{CalendarParts, Season, season_from_month0};
use serde::{Deserialize, Serialize};

use crate::item::{ScoringItem, Seasonality};

pub const ELEMENTAL_WEIGHT: f64 = 0.3;
pub const ZODIACAL_WEIGHT: f64 = 0.2;
pub const LUNAR_WEIGHT: f64 = 0.15;
pub const PLANETARY_WEIGHT: f64 = 0.25;
pub const SEASONAL_WEIGHT: f64 = 0.1;

/// Score for an undeclared field.
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Declared affinity matches.
pub const AFFINITY_MATCH: f64 = 0.8;
/// Declared sign or season list does not match.
pub const AFFINITY_MISS: f64 = 0.3;
/// Declared lunar-phase list does not match.
pub const LUNAR_MISS: f64 = 0.4;
pub const FAVORABLE_BONUS: f64 = 0.3;
pub const UNFAVORABLE_PENALTY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub elemental: f64,
    pub zodiacal: f64,
    pub lunar: f64,
    pub planetary: f64,
    pub seasonal: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Weighted total, clamped to `[0, 1]`.
    pub fn weighted_total(
        elemental: f64,
        zodiacal: f64,
        lunar: f64,
        planetary: f64,
        seasonal: f64,
    ) -> f64 {
        let total = ELEMENTAL_WEIGHT * elemental
            + ZODIACAL_WEIGHT * zodiacal
            + LUNAR_WEIGHT * lunar
            + PLANETARY_WEIGHT * planetary
            + SEASONAL_WEIGHT * seasonal;
        clamp_unit(total)
    }
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { NEUTRAL_SCORE } else { x.clamp(0.0, 1.0) }
}

/// `1 - L1(item, balance) / 2` over normalized vectors.
pub fn elemental_score(item: Option<&ElementalVector>, balance: &ElementalVector) -> f64 {
    match item {
        Some(v) => clamp_unit(v.normalized().similarity(&balance.normalized())),
        None => NEUTRAL_SCORE,
    }
}

pub fn zodiacal_score(declared: Option<&[String]>, sign: ZodiacSign) -> f64 {
    match declared {
        None => NEUTRAL_SCORE,
        Some([]) => NEUTRAL_SCORE,
        Some(names) => {
            let hit = names
                .iter()
                .filter_map(|n| n.trim().parse::<ZodiacSign>().ok())
                .any(|s| s == sign);
            if hit { AFFINITY_MATCH } else { AFFINITY_MISS }
        }
    }
}

pub fn lunar_score(declared: Option<&[String]>, phase: LunarPhase) -> f64 {
    match declared {
        None => NEUTRAL_SCORE,
        Some([]) => NEUTRAL_SCORE,
        Some(names) => {
            let hit = names
                .iter()
                .filter_map(|n| n.trim().parse::<LunarPhase>().ok())
                .any(|p| p == phase);
            if hit { AFFINITY_MATCH } else { LUNAR_MISS }
        }
    }
}

/// Fraction of declared names that parse to a dominant body.
fn matched_fraction(declared: Option<&[String]>, dominant: &[Body]) -> f64 {
    match declared {
        None | Some([]) => 0.0,
        Some(names) => {
            let matched = names
                .iter()
                .filter_map(|n| n.trim().parse::<Body>().ok())
                .filter(|b| dominant.contains(b))
                .count();
            matched as f64 / names.len() as f64
        }
    }
}

pub fn planetary_score(
    favorable: Option<&[String]>,
    unfavorable: Option<&[String]>,
    dominant: &[Body],
) -> f64 {
    let score = NEUTRAL_SCORE + FAVORABLE_BONUS * matched_fraction(favorable, dominant)
        - UNFAVORABLE_PENALTY * matched_fraction(unfavorable, dominant);
    clamp_unit(score)
}

pub fn seasonal_score(declared: Option<&Seasonality>, season: Season) -> f64 {
    match declared {
        None => NEUTRAL_SCORE,
        Some(s) if s.is_empty() => NEUTRAL_SCORE,
        Some(s) if s.is_all_year() || s.includes(season) => AFFINITY_MATCH,
        Some(_) => AFFINITY_MISS,
    }
}

/// Season of the alignment's calendar date.
pub fn current_season(alignment: &Alignment) -> Season {
    season_from_month0(CalendarParts::from_timestamp(alignment.timestamp).month0)
}

/// Full breakdown of `item` against `alignment`.
pub fn score_item(item: &ScoringItem, alignment: &Alignment) -> ScoreBreakdown {
    let dominant = alignment.dominant_body_set();
    let elemental = elemental_score(
        item.elemental_properties.as_ref(),
        &alignment.elemental_balance,
    );
    let zodiacal = zodiacal_score(item.zodiac_affinities.as_deref(), alignment.zodiac_sign);
    let lunar = lunar_score(item.lunar_phase_affinities.as_deref(), alignment.lunar_phase);
    let planetary = planetary_score(
        item.favorable_planets.as_deref(),
        item.unfavorable_planets.as_deref(),
        &dominant,
    );
    let seasonal = seasonal_score(item.seasonality.as_ref(), current_season(alignment));
    ScoreBreakdown {
        elemental,
        zodiacal,
        lunar,
        planetary,
        seasonal,
        total: ScoreBreakdown::weighted_total(elemental, zodiacal, lunar, planetary, seasonal),
    }
}
