//! End-to-end fallback behavior: snapshot file, then mean elements, then
//! the static table.

use std::io::Write;
use std::sync::Arc;

use alchm_core::{Body, ZodiacSign};
use alchm_ephemeris::{
    BreakerState, MeanElementsSource, PositionChain, SnapshotFileSource, SourceError,
    StaticPositionSource,
};
use alchm_time::{Clock, ManualClock};
use chrono::{Duration, TimeZone, Utc};

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 28, 12, 0, 0).unwrap(),
    ))
}

#[test]
fn snapshot_file_is_primary() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"Sun": {{"sign": "taurus", "degree": 3, "minute": 15}},
            "moon": {{"sign": "Libra", "degree": 20, "minute": 0, "isRetrograde": false}},
            "Chiron": {{"sign": "aries", "degree": 1}}}}"#
    )
    .unwrap();

    let clock = manual_clock();
    let chain = PositionChain::new(clock.clone())
        .with_source(SnapshotFileSource::new(file.path()))
        .with_source(MeanElementsSource);

    let out = chain.fetch(clock.now(), None);
    assert_eq!(out.source, SnapshotFileSource::NAME);
    assert!(!out.fell_back);
    assert_eq!(out.positions.len(), 2);
    assert_eq!(out.positions[&Body::Sun].sign(), ZodiacSign::Taurus);
    assert_eq!(out.positions[&Body::Moon].sign(), ZodiacSign::Libra);
}

#[test]
fn missing_snapshot_falls_to_mean_elements() {
    let dir = tempfile::tempdir().unwrap();
    let clock = manual_clock();
    let chain = PositionChain::new(clock.clone())
        .with_source(SnapshotFileSource::new(dir.path().join("absent.json")))
        .with_source(MeanElementsSource);

    let out = chain.fetch(clock.now(), None);
    assert_eq!(out.source, MeanElementsSource::NAME);
    assert!(out.fell_back);
    assert_eq!(out.positions.len(), 10);
    assert!(matches!(out.failures[0].error, SourceError::Io(_)));
}

#[test]
fn corrupt_snapshot_trips_breaker_and_static_table_answers() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let clock = manual_clock();
    let chain = PositionChain::new(clock.clone())
        .with_breaker(1, Duration::seconds(60))
        .with_source(SnapshotFileSource::new(file.path()));

    let first = chain.fetch(clock.now(), None);
    assert_eq!(first.source, StaticPositionSource::NAME);
    assert!(matches!(first.failures[0].error, SourceError::Parse(_)));
    assert_eq!(first.positions, StaticPositionSource::table());

    let statuses = chain.source_statuses();
    assert_eq!(statuses[0].breaker.state, BreakerState::Open);

    // Fix the file; still skipped until cooldown passes.
    let good = r#"{"Mars": {"sign": "leo", "degree": 2, "minute": 0}}"#;
    std::fs::write(file.path(), good).unwrap();
    let skipped = chain.fetch(clock.now(), None);
    assert!(matches!(skipped.failures[0].error, SourceError::CircuitOpen(_)));

    clock.advance(Duration::seconds(61));
    let recovered = chain.fetch(clock.now(), None);
    assert_eq!(recovered.source, SnapshotFileSource::NAME);
    assert_eq!(recovered.positions[&Body::Mars].sign(), ZodiacSign::Leo);
    assert_eq!(chain.source_statuses()[0].breaker.state, BreakerState::Closed);
}
