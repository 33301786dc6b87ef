use std::io::Write;

use alchm_config::{Config, ConfigError};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "scoring": {{ "cache_capacity": 16 }},
            "positions": {{ "snapshot_path": "/tmp/positions.json", "breaker_threshold": 5 }},
            "log_filter": "debug"
        }}"#
    )
    .unwrap();

    let config = Config::load_with(Some(file.path()), no_env).unwrap();
    assert_eq!(config.scoring.cache_capacity, 16);
    assert_eq!(config.scoring.ttl_secs, 1800);
    assert_eq!(config.positions.breaker_threshold, 5);
    assert!(config.positions.use_mean_elements);
    assert_eq!(config.log_filter, "debug");
    assert_eq!(config.alignment, Config::default().alignment);
}

#[test]
fn environment_wins_over_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "alignment": {{ "ttl_secs": 120 }} }}"#).unwrap();

    let config = Config::load_with(Some(file.path()), |key| {
        (key == "ALCHM_ALIGNMENT_TTL_SECS").then(|| "600".to_string())
    })
    .unwrap();
    assert_eq!(config.alignment.ttl_secs, 600);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = Config::load_with(Some(&path), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = Config::load_with(Some(file.path()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn invalid_file_values_fail_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "alignment": {{ "synodic_period_days": 0.0 }} }}"#).unwrap();
    let err = Config::load_with(Some(file.path()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn chain_lists_configured_sources() {
    let mut config = Config::default();
    config.positions.snapshot_path = Some("/nonexistent/positions.json".into());
    let clock: std::sync::Arc<dyn alchm_time::Clock> =
        std::sync::Arc::new(alchm_time::SystemClock);
    let chain = config.build_chain(clock);
    assert_eq!(
        chain.source_names(),
        vec!["snapshot-file", "mean-elements", "static-table"]
    );
}

#[test]
fn unrepresentable_ttl_from_environment_is_rejected() {
    let err = Config::load_with(None, |key| {
        (key == "ALCHM_ALIGNMENT_TTL_SECS").then(|| "100000000000000000".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn unrepresentable_cooldown_in_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "positions": {{ "breaker_cooldown_secs": 18446744073709551615 }} }}"#
    )
    .unwrap();
    let err = Config::load_with(Some(file.path()), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
