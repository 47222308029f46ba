//! # Configuration Tests
//!
//! Defaults, partial JSON documents, range validation, and file loading.

use std::fs;

use kernsim_core::common::ConfigError;
use kernsim_core::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.general.max_cycles, None);
    assert_eq!(config.general.cycles_per_second, 100_000);
    assert_eq!(config.scheduler.quantum, 200);
    assert_eq!(config.scheduler.context_switch_overhead, 1);
    assert_eq!(config.memory.page_frames, 100);
    assert_eq!(config.memory.swap_latency, 1000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_empty_document_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_partial_sections_keep_defaults() {
    let json = r#"{ "scheduler": { "quantum": 7 }, "memory": { "swap_latency": 30 } }"#;
    let config = Config::from_json(json).unwrap();

    assert_eq!(config.scheduler.quantum, 7);
    assert_eq!(config.scheduler.context_switch_overhead, 1);
    assert_eq!(config.memory.swap_latency, 30);
    assert_eq!(config.memory.page_frames, 100);
    assert_eq!(config.general, GeneralConfig::default());
}

#[test]
fn test_config_max_cycles() {
    let config = Config::from_json(r#"{ "general": { "max_cycles": 5000 } }"#).unwrap();
    assert_eq!(config.general.max_cycles, Some(5000));
}

#[rstest]
#[case(r#"{ "scheduler": { "quantum": 0 } }"#, "scheduler.quantum")]
#[case(
    r#"{ "scheduler": { "context_switch_overhead": 0 } }"#,
    "scheduler.context_switch_overhead"
)]
#[case(r#"{ "memory": { "page_frames": 0 } }"#, "memory.page_frames")]
#[case(r#"{ "memory": { "swap_latency": 0 } }"#, "memory.swap_latency")]
#[case(r#"{ "general": { "cycles_per_second": 0 } }"#, "general.cycles_per_second")]
#[case(r#"{ "general": { "max_cycles": 0 } }"#, "general.max_cycles")]
fn test_config_rejects_zero(#[case] json: &str, #[case] expected: &str) {
    match Config::from_json(json) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected Invalid({expected}), got {other:?}"),
    }
}

#[rstest]
#[case(r#"{ "scheduler": { "quantum": -3 } }"#)]
#[case(r#"{ "memory": { "page_frames": "many" } }"#)]
#[case("not json")]
fn test_config_rejects_malformed(#[case] json: &str) {
    assert!(matches!(
        Config::from_json(json),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_config_json_roundtrip() {
    let mut config = Config::default();
    config.scheduler.quantum = 12;
    config.general.max_cycles = Some(99);

    let json = serde_json::to_string_pretty(&config).unwrap();
    assert_eq!(Config::from_json(&json).unwrap(), config);
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kernel.json");
    fs::write(&path, r#"{ "memory": { "page_frames": 3 } }"#).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.memory.page_frames, 3);
}

#[test]
fn test_config_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    match Config::from_file(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_config_error_messages() {
    let err = Config::from_json(r#"{ "scheduler": { "quantum": 0 } }"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid configuration: scheduler.quantum must be positive"
    );
}
