//! End-to-end behaviour of the facade on a manual clock. Positions come from
//! the mean-elements source, so no files or network are needed.

use std::sync::Arc;

use alchm_rs::*;
use chrono::{Duration, TimeZone, Utc};

fn start() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 21, 12, 0, 0).unwrap()
}

fn build(clock: &Arc<ManualClock>) -> Recommender {
    let shared: Arc<dyn Clock> = clock.clone();
    Recommender::with_clock(&Config::default(), shared).unwrap()
}

fn basil() -> ScoringItem {
    ScoringItem::new("basil", "Basil")
        .with_elements(ElementalVector::new(0.4, 0.1, 0.2, 0.3))
        .with_zodiac(&["aries", "leo"])
        .with_planets(&["Mars"], &["Saturn"])
        .with_energy(EnergyVector::new(2.0, 1.0, 1.0, 1.0))
}

fn kale() -> ScoringItem {
    ScoringItem::new("kale", "Kale")
        .with_elements(ElementalVector::new(0.1, 0.2, 0.6, 0.1))
        .with_zodiac(&["capricorn"])
        .with_lunar_phases(&["waning crescent"])
        .with_energy(EnergyVector::new(1.0, 1.0, 2.0, 2.0))
}

#[test]
fn positions_come_from_mean_elements() {
    let clock = Arc::new(ManualClock::new(start()));
    let rec = build(&clock);
    let alignment = rec.current_alignment();
    assert_eq!(alignment.position_source, "mean-elements");
    assert!(!alignment.is_fallback);
    assert_eq!(alignment.zodiac_sign, ZodiacSign::Aries);
}

#[test]
fn score_cache_round_trip_within_ttl() {
    let clock = Arc::new(ManualClock::new(start()));
    let rec = build(&clock);

    let first = rec.score(&basil());
    let second = rec.score(&basil());
    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.score, second.score);
    assert_eq!(first.breakdown, second.breakdown);
    assert_eq!(rec.scorer().computations(), 1);

    let diag = rec.diagnostics();
    assert_eq!(diag.size, 1);
    assert_eq!(diag.hits, 1);
    assert_eq!(diag.misses, 1);
    assert!((diag.hit_rate - 0.5).abs() < 1e-12);
}

#[test]
fn score_recomputed_after_score_ttl() {
    let clock = Arc::new(ManualClock::new(start()));
    let rec = build(&clock);

    let first = rec.score(&basil());
    clock.advance(Duration::seconds(1801));
    let again = rec.score(&basil());

    // Alignment slot (1 h) is still fresh, so only the score TTL expired.
    assert_eq!(first.fingerprint, again.fingerprint);
    assert!(!again.cached);
    assert_eq!(rec.scorer().computations(), 2);
    assert_eq!(rec.diagnostics().calculator.computations, 1);
}

/// Forty days expires both tiers; the rescored entry lands under the new
/// fingerprint and the old one is left for pruning.
#[test]
fn expired_tiers_rescore_under_new_fingerprint() {
    let clock = Arc::new(ManualClock::new(start()));
    let rec = build(&clock);

    let before = rec.score(&basil());
    clock.advance(Duration::days(40));
    let after = rec.score(&basil());

    assert_ne!(before.fingerprint, after.fingerprint);
    assert!(!after.cached);
    assert_eq!(rec.current_alignment().zodiac_sign, ZodiacSign::Taurus);
    assert_eq!(rec.prune_stale_scores(), 1);
    assert_eq!(rec.diagnostics().size, 1);
}

#[test]
fn force_refresh_clears_both_tiers() {
    let clock = Arc::new(ManualClock::new(start()));
    let rec = build(&clock);

    rec.score(&basil());
    rec.score(&kale());
    assert_eq!(rec.diagnostics().size, 2);

    let refreshed = rec.force_refresh();
    assert_eq!(rec.diagnostics().size, 0);
    assert_eq!(rec.diagnostics().calculator.computations, 2);
    assert_eq!(refreshed.timestamp, start());

    let rescored = rec.score(&basil());
    assert!(!rescored.cached);
    assert_eq!(rescored.fingerprint, refreshed.fingerprint);
}

#[test]
fn identical_inputs_give_identical_results() {
    let clock = Arc::new(ManualClock::new(start()));
    let a = build(&clock);
    let b = build(&clock);

    let items = vec![kale(), basil()];
    let ra = a.rank(&items);
    let rb = b.rank(&items);
    assert_eq!(ra, rb);
    assert_eq!(a.current_alignment().fingerprint, b.current_alignment().fingerprint);
    assert!(ra[0].score >= ra[1].score);
}

#[test]
fn ingredient_set_combines_member_kalchm() {
    let clock = Arc::new(ManualClock::new(start()));
    let rec = build(&clock);

    let set = rec.score_ingredient_set(&[basil(), kale()]);
    assert_eq!(set.contributing, 2);
    assert_eq!(set.members.len(), 2);
    assert!(set.kalchm.is_finite() && set.kalchm > 0.0);
    assert!((0.0..=1.0).contains(&set.mean_score));
}

#[test]
fn diagnostics_report_alignment_age() {
    let clock = Arc::new(ManualClock::new(start()));
    let rec = build(&clock);

    assert_eq!(rec.diagnostics().alignment_age_secs, None);
    rec.current_alignment();
    clock.advance(Duration::seconds(120));

    let diag = rec.diagnostics();
    assert_eq!(diag.alignment_age_secs, Some(120));
    assert_eq!(diag.alignment_source.as_deref(), Some("mean-elements"));
    assert_eq!(diag.sources.len(), 1);

    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["alignmentAgeSecs"], 120);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = Config::default();
    config.scoring.cache_capacity = 0;
    let err = Recommender::from_config(&config).unwrap_err();
    assert!(matches!(err, RecommenderError::Config(_)));
}

#[test]
fn unrepresentable_ttl_is_a_construction_error() {
    let mut config = Config::default();
    config.alignment.ttl_secs = 100_000_000_000_000_000;
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(start()));
    let err = Recommender::with_clock(&config, clock).unwrap_err();
    assert!(matches!(err, RecommenderError::Config(ConfigError::Invalid(_))));
}
