//! Scorer properties over generated items and real alignments.

use std::sync::Arc;

use alchm_alignment::{AlignmentCalculator, CalculatorConfig};
use alchm_core::ElementalVector;
use alchm_ephemeris::PositionChain;
use alchm_scoring::{CompatibilityScorer, ScorerConfig, ScoringItem, Seasonality};
use alchm_time::{Clock, ManualClock};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

struct Fixture {
    clock: Arc<ManualClock>,
    calculator: AlignmentCalculator,
    scorer: CompatibilityScorer,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 28, 12, 0, 0).unwrap(),
    ));
    let shared: Arc<dyn Clock> = clock.clone();
    let chain = Arc::new(PositionChain::new(shared.clone()));
    let calculator =
        AlignmentCalculator::new(CalculatorConfig::default(), shared.clone(), chain).unwrap();
    let scorer = CompatibilityScorer::new(ScorerConfig::default(), shared).unwrap();
    Fixture {
        clock,
        calculator,
        scorer,
    }
}

const SIGNS: [&str; 5] = ["aries", "Leo", "virgo", "Pisces", "ophiuchus"];
const PLANETS: [&str; 5] = ["Sun", "moon", "Venus", "Pluto", "Vulcan"];
const SEASONS: [&str; 5] = ["spring", "Summer", "fall", "winter", "all"];

fn arb_item() -> impl Strategy<Value = ScoringItem> {
    (
        "[a-z]{1,8}",
        proptest::option::of((0.0f64..5.0, 0.0f64..5.0, 0.0f64..5.0, 0.0f64..5.0)),
        proptest::option::of(proptest::sample::subsequence(SIGNS.to_vec(), 0..=5)),
        proptest::option::of(proptest::sample::subsequence(PLANETS.to_vec(), 0..=5)),
        proptest::option::of(proptest::sample::subsequence(PLANETS.to_vec(), 0..=5)),
        proptest::option::of(proptest::sample::subsequence(SEASONS.to_vec(), 0..=5)),
    )
        .prop_map(|(id, elements, signs, fav, unfav, seasons)| {
            let mut item = ScoringItem::new(id.clone(), id);
            item.elemental_properties = elements.map(|(f, w, e, a)| ElementalVector::new(f, w, e, a));
            item.zodiac_affinities = signs.map(|v| v.into_iter().map(String::from).collect());
            item.favorable_planets = fav.map(|v| v.into_iter().map(String::from).collect());
            item.unfavorable_planets = unfav.map(|v| v.into_iter().map(String::from).collect());
            item.seasonality =
                seasons.map(|v| Seasonality::Many(v.into_iter().map(String::from).collect()));
            item
        })
}

proptest! {
    #[test]
    fn scores_are_in_unit_interval(item in arb_item()) {
        let f = fixture();
        let a = f.calculator.current_alignment(false);
        let s = f.scorer.score(&item, &a);
        let b = s.breakdown;
        for v in [b.elemental, b.zodiacal, b.lunar, b.planetary, b.seasonal, s.score] {
            prop_assert!((0.0..=1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn scoring_is_deterministic(item in arb_item()) {
        let f = fixture();
        let a = f.calculator.current_alignment(false);
        let first = f.scorer.score(&item, &a);
        f.scorer.invalidate_all();
        let second = f.scorer.score(&item, &a);
        prop_assert_eq!(first.score, second.score);
        prop_assert_eq!(first.breakdown, second.breakdown);
        prop_assert_eq!(f.scorer.computations(), 2);
    }
}

#[test]
fn fingerprint_change_misses_cache() {
    let f = fixture();
    let item = ScoringItem::new("tea", "Tea").with_zodiac(&["aries"]);
    let before = f.calculator.current_alignment(false);
    f.scorer.score(&item, &before);

    // A month later: new sign, new fingerprint.
    f.clock.advance(Duration::days(30));
    let after = f.calculator.current_alignment(false);
    assert_ne!(before.fingerprint, after.fingerprint);

    let rescored = f.scorer.score(&item, &after);
    assert!(!rescored.cached);
    assert_eq!(f.scorer.computations(), 2);

    assert_eq!(f.scorer.cache().retain_fingerprint(&after.fingerprint), 1);
    assert_eq!(f.scorer.cache_stats().size, 1);
}

#[test]
fn cache_stats_track_hits_and_misses() {
    let f = fixture();
    let a = f.calculator.current_alignment(false);
    let items: Vec<ScoringItem> = (0..3)
        .map(|i| ScoringItem::new(format!("i{i}"), "x"))
        .collect();
    f.scorer.rank(&items, &a);
    f.scorer.rank(&items, &a);
    let stats = f.scorer.cache_stats();
    assert_eq!(stats.size, 3);
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 3);
    assert!((stats.hit_rate - 0.5).abs() < 1e-12);
}
