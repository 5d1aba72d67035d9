//! Unit tests for configuration resolution, graceful degradation and atomic writes
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate FOODSCAN_CONFIG are marked with #[serial].

use foodscan_common::config::{
    load_toml_config, resolve_and_load, temp_path_for, write_toml_config, ConfigPathResolver,
    ConfigSource, LoggingConfig, CONFIG_ENV_VAR,
};
use foodscan_common::Error;
use serde::{Deserialize, Serialize};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SampleConfig {
    logging: LoggingConfig,
    window_hours: u32,
}

#[test]
fn test_logging_defaults() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.ansi);
}

#[test]
#[serial]
fn test_resolver_cli_argument_wins() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");
    let resolver = ConfigPathResolver::new("transform");
    let (path, source) = resolver
        .resolve(Some(Path::new("/tmp/from-cli.toml")))
        .unwrap();
    assert_eq!(path, PathBuf::from("/tmp/from-cli.toml"));
    assert_eq!(source, ConfigSource::CommandLine);
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolver_env_var_used_without_cli() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");
    let resolver = ConfigPathResolver::new("transform");
    let (path, source) = resolver.resolve(None).unwrap();
    assert_eq!(path, PathBuf::from("/tmp/from-env.toml"));
    assert_eq!(source, ConfigSource::Environment);
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_and_load_missing_file_gives_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let resolver = ConfigPathResolver::new("transform");
    let config: SampleConfig = resolve_and_load(&resolver, Some(&missing)).unwrap();
    assert_eq!(config, SampleConfig::default());
}

#[test]
fn test_load_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("partial.toml");
    std::fs::write(&path, "window_hours = 6\n").unwrap();

    let config: SampleConfig = load_toml_config(&path).unwrap();
    assert_eq!(config.window_hours, 6);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_load_malformed_file_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "window_hours = [not toml").unwrap();

    let result: Result<SampleConfig, Error> = load_toml_config(&path);
    assert!(matches!(result, Err(Error::TomlParse(_))));
}

#[test]
fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("out.toml");

    let config = SampleConfig {
        logging: LoggingConfig::default(),
        window_hours: 12,
    };
    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!temp_path_for(&target).exists());

    let reloaded: SampleConfig = load_toml_config(&target).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_atomic_write_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("dir").join("out.toml");

    write_toml_config(&SampleConfig::default(), &target).unwrap();
    assert!(target.exists());
}

#[test]
#[cfg(unix)]
fn test_atomic_write_sets_permissions_0600() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("perm.toml");
    write_toml_config(&SampleConfig::default(), &target).unwrap();

    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_temp_path_is_sibling() {
    let tmp = temp_path_for(Path::new("/var/lib/foodscan/index.json"));
    assert_eq!(tmp, PathBuf::from("/var/lib/foodscan/index.json.tmp"));
}
