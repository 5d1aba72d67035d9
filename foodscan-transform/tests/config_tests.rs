//! Tests for transform configuration loading
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate FOODSCAN_CONFIG are marked with #[serial].

use foodscan_common::config::CONFIG_ENV_VAR;
use foodscan_transform::config::TransformConfig;
use foodscan_transform::dedup::{DedupPreset, DedupStage, DedupStrategy};
use foodscan_transform::TransformError;
use serial_test::serial;
use std::env;
use tempfile::TempDir;

const SAMPLE: &str = r#"
[logging]
level = "warn"
ansi = false

[deduplication]
strategy = "time_based"
stage = "after_validation"
rejected_ttl_hours = 48
index_location = "/var/lib/foodscan/dedup_index.json"

[pipeline]
worker_count = 8
"#;

#[test]
#[serial]
fn test_cli_path_loads_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transform.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = TransformConfig::load(Some(&path)).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert!(!config.logging.ansi);
    assert_eq!(config.deduplication.stage, DedupStage::AfterValidation);
    assert_eq!(config.deduplication.rejected_ttl_hours, 48);
    assert_eq!(config.deduplication.validated_ttl_hours, 2160);
    assert_eq!(config.pipeline.worker_count, 8);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("from_env.toml");
    std::fs::write(&path, SAMPLE).unwrap();
    env::set_var(CONFIG_ENV_VAR, &path);

    let config = TransformConfig::load(None).unwrap();
    assert_eq!(config.pipeline.worker_count, 8);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_gives_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let config = TransformConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.deduplication.strategy, DedupStrategy::TimeBased);
    assert!(config.deduplication.index_location.is_none());
}

#[test]
#[serial]
fn test_unknown_strategy_is_config_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[deduplication]\nstrategy = \"sometimes\"\n").unwrap();

    let result = TransformConfig::load(Some(&path));
    assert!(matches!(result, Err(TransformError::Common(_))));
}

#[test]
#[serial]
fn test_zero_ttl_is_config_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zero.toml");
    std::fs::write(&path, "[deduplication]\npartial_ttl_hours = 0\n").unwrap();

    let result = TransformConfig::load(Some(&path));
    assert!(matches!(result, Err(TransformError::Config(_))));
}

#[test]
fn test_retry_preset_keeps_index_location() {
    let mut config = TransformConfig::default();
    config.deduplication.index_location = Some("/tmp/index.json".into());
    let config = config.with_preset(DedupPreset::RetryFocused);
    assert_eq!(config.deduplication.rejected_ttl_hours, 72);
    assert_eq!(config.deduplication.dedup_window_hours, 6);
    assert!(config.deduplication.index_location.is_some());
}
