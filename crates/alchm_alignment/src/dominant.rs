//! Dominant bodies and the elemental balance derived from them.

use alchm_core::{Body, Element, ElementalVector, LunarPhase, ZodiacSign};
use serde::Serialize;

use crate::tables::{
    AlignmentTables, FULL_MOON_WEIGHT, HOUR_RULER_WEIGHT, OUTER_BODY_WEIGHTS,
    WEEKDAY_RULER_WEIGHT,
};

/// Bonus added to the element of the current sign.
pub const SIGN_ELEMENT_BONUS: f64 = 0.2;
/// Per-unit-weight bonus from each dominant body.
pub const BODY_ELEMENT_FACTOR: f64 = 0.1;
pub const FULL_NEW_MOON_BONUS: f64 = 0.15;
pub const WAXING_WANING_BONUS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DominantBody {
    pub body: Body,
    pub weight: f64,
}

impl DominantBody {
    pub const fn new(body: Body, weight: f64) -> Self {
        Self { body, weight }
    }
}

/// Weekday ruler, hour ruler, full-moon Moon, then the outer bodies.
///
/// Insertion order; a body that rules both the day and the hour appears
/// twice.
pub fn calculate_dominant_bodies(
    tables: &AlignmentTables,
    weekday: u32,
    hour: u32,
    phase: LunarPhase,
) -> Vec<DominantBody> {
    let mut out = Vec::with_capacity(6);
    out.push(DominantBody::new(tables.weekday_ruler(weekday), WEEKDAY_RULER_WEIGHT));
    out.push(DominantBody::new(tables.hour_ruler(hour), HOUR_RULER_WEIGHT));
    if phase == LunarPhase::FullMoon {
        out.push(DominantBody::new(Body::Moon, FULL_MOON_WEIGHT));
    }
    out.extend(OUTER_BODY_WEIGHTS.iter().map(|&(b, w)| DominantBody::new(b, w)));
    out
}

fn lunar_bonus(phase: LunarPhase) -> Option<(Element, f64)> {
    match phase {
        LunarPhase::FullMoon => Some((Element::Water, FULL_NEW_MOON_BONUS)),
        LunarPhase::NewMoon => Some((Element::Air, FULL_NEW_MOON_BONUS)),
        p if p.is_waxing() => Some((Element::Fire, WAXING_WANING_BONUS)),
        p if p.is_waning() => Some((Element::Earth, WAXING_WANING_BONUS)),
        _ => None,
    }
}

/// Quarters, plus sign, dominant-body and lunar bonuses, normalized.
pub fn calculate_elemental_balance(
    sign: ZodiacSign,
    dominant: &[DominantBody],
    phase: LunarPhase,
) -> ElementalVector {
    let mut v = ElementalVector::balanced();
    v.add(sign.element(), SIGN_ELEMENT_BONUS);
    for d in dominant {
        v.add(d.body.element(), BODY_ELEMENT_FACTOR * d.weight);
    }
    if let Some((element, bonus)) = lunar_bonus(phase) {
        v.add(element, bonus);
    }
    v.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sunday_noon_full_moon() {
        let t = AlignmentTables::default();
        // Hour 12: 12 % 7 = 5 -> Jupiter.
        let d = calculate_dominant_bodies(&t, 0, 12, LunarPhase::FullMoon);
        let bodies: Vec<Body> = d.iter().map(|x| x.body).collect();
        assert_eq!(
            bodies,
            vec![Body::Sun, Body::Jupiter, Body::Moon, Body::Uranus, Body::Neptune, Body::Pluto]
        );
        assert_eq!(d[0].weight, 0.7);
        assert_eq!(d[1].weight, 0.5);
        assert_eq!(d[2].weight, 0.6);
    }

    #[test]
    fn duplicates_are_kept() {
        let t = AlignmentTables::default();
        // Sunday at 00h: Sun rules both day and hour.
        let d = calculate_dominant_bodies(&t, 0, 0, LunarPhase::WaxingCrescent);
        assert_eq!(d.len(), 5);
        assert_eq!(d[0].body, Body::Sun);
        assert_eq!(d[1].body, Body::Sun);
    }

    #[test]
    fn balance_is_normalized_and_biased() {
        let t = AlignmentTables::default();
        let d = calculate_dominant_bodies(&t, 2, 6, LunarPhase::WaxingGibbous);
        let b = calculate_elemental_balance(ZodiacSign::Leo, &d, LunarPhase::WaxingGibbous);
        assert!(b.is_normalized());
        assert_eq!(b.dominant(), Element::Fire);
    }

    #[test]
    fn full_moon_adds_water() {
        let plain = calculate_elemental_balance(ZodiacSign::Aries, &[], LunarPhase::FirstQuarter);
        let full = calculate_elemental_balance(ZodiacSign::Aries, &[], LunarPhase::FullMoon);
        assert!(full.water > plain.water);
    }
}
