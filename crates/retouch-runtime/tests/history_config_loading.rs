#![cfg(feature = "history-config")]
#![forbid(unsafe_code)]

//! Loading [`HistoryConfig`] from TOML and JSON.

use std::io::Write;

use retouch_runtime::{HistoryConfig, HistoryConfigError, MergeConfig};

#[test]
fn empty_toml_is_default() {
    let config = HistoryConfig::from_toml_str("").unwrap();
    assert_eq!(config, HistoryConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let config = HistoryConfig::from_toml_str(
        r#"
        max_entries = 80

        [merge]
        window_ms = 750

        [cleanup]
        enabled = false
        "#,
    )
    .unwrap();

    assert_eq!(config.max_entries, 80);
    assert_eq!(config.max_bytes, 100_000_000);
    assert_eq!(
        config.merge,
        MergeConfig {
            enabled: true,
            window_ms: 750
        }
    );
    assert!(!config.cleanup.enabled);
    assert_eq!(config.cleanup.max_age_ms, 300_000);
    assert_eq!(config.prune.churn_threshold, 20);
}

#[test]
fn json_round_trip() {
    let mut config = HistoryConfig::new(12, 4096);
    config.prune.retain_ratio = 0.5;
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(HistoryConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn toml_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_bytes = 2048\n[prune]\nchurn_threshold = 5").unwrap();

    let config = HistoryConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.max_bytes, 2048);
    assert_eq!(config.prune.churn_threshold, 5);
}

#[test]
fn json_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"max_entries": 9, "cleanup": {{"min_retained": 2}}}}"#).unwrap();

    let config = HistoryConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.max_entries, 9);
    assert_eq!(config.cleanup.min_retained, 2);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HistoryConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, HistoryConfigError::Io(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn malformed_input_reports_format() {
    let toml_err = HistoryConfig::from_toml_str("max_entries = \"lots\"").unwrap_err();
    assert!(matches!(toml_err, HistoryConfigError::Toml(_)));
    assert!(toml_err.to_string().starts_with("TOML parse error"));

    let json_err = HistoryConfig::from_json_str("{").unwrap_err();
    assert!(matches!(json_err, HistoryConfigError::Json(_)));
    assert!(json_err.to_string().starts_with("JSON parse error"));
}

#[test]
fn loaded_config_can_be_validated() {
    let config = HistoryConfig::from_toml_str("[prune]\npressure_ratio = 1.5").unwrap();
    let err = config.validated().unwrap_err();
    match err {
        HistoryConfigError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.contains("pressure_ratio")));
        }
        other => panic!("expected validation error, got {other}"),
    }
}
