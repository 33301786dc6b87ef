//! Property tests for the transform's exposed invariants.

use alchm_core::{
    ALL_BODIES, ALL_SIGNS, AlchemicalTransform, EnergyVector, Position, PositionMap, kalchm,
};
use proptest::prelude::*;

fn arb_position() -> impl Strategy<Value = Position> {
    (0u8..12, 0u8..30, 0u8..60, any::<bool>()).prop_map(|(sign, degree, minute, retro)| {
        Position::new(ALL_SIGNS[sign as usize], degree, minute, retro).unwrap()
    })
}

fn arb_positions() -> impl Strategy<Value = PositionMap> {
    proptest::collection::vec(proptest::option::of(arb_position()), ALL_BODIES.len()).prop_map(
        |slots| {
            ALL_BODIES
                .iter()
                .zip(slots)
                .filter_map(|(body, slot)| slot.map(|p| (*body, p)))
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn exposed_elements_sum_to_one(positions in arb_positions()) {
        let out = AlchemicalTransform::default().transform(&positions);
        let e = out.elements;
        prop_assert!(e.fire >= 0.0 && e.water >= 0.0 && e.earth >= 0.0 && e.air >= 0.0);
        prop_assert!((e.sum() - 1.0).abs() <= 1e-6);
    }

    #[test]
    fn metrics_always_finite(positions in arb_positions()) {
        let out = AlchemicalTransform::default().transform(&positions);
        prop_assert!(out.thermodynamics.is_finite());
        prop_assert!(out.thermodynamics.kalchm > 0.0);
    }

    #[test]
    fn kalchm_positive_for_any_energy(
        s in 0.0f64..400.0, e in 0.0f64..400.0, m in 0.0f64..400.0, sub in 0.0f64..400.0,
    ) {
        let k = kalchm(&EnergyVector::new(s, e, m, sub));
        prop_assert!(k.is_finite());
        prop_assert!(k > 0.0);
    }

    #[test]
    fn transform_is_deterministic(positions in arb_positions()) {
        let t = AlchemicalTransform::default();
        prop_assert_eq!(t.transform(&positions), t.transform(&positions));
    }
}

#[test]
fn all_zero_energy_kalchm_is_exactly_one() {
    assert_eq!(kalchm(&EnergyVector::default()), 1.0);
}

#[test]
fn full_chart_counts_every_body_once() {
    let positions: PositionMap = ALL_BODIES
        .iter()
        .enumerate()
        .map(|(i, b)| (*b, Position::from_longitude(i as f64 * 31.0, false)))
        .collect();
    let out = AlchemicalTransform::default().transform(&positions);
    assert!((out.raw_elements.sum() - ALL_BODIES.len() as f64).abs() < 1e-12);
}
