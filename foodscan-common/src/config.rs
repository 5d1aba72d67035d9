//! Configuration loading, path resolution and atomic TOML writes
//!
//! Every foodscan binary reads one TOML file. Its location is resolved in
//! priority order:
//! 1. Command-line argument (highest priority)
//! 2. `FOODSCAN_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/foodscan/<module>.toml` on Linux)
//! 4. None: compiled defaults are used
//!
//! A missing or unreadable file never stops startup: the caller gets the
//! section defaults and a warning is logged. A file that exists but fails to
//! parse is a configuration error, reported once.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FOODSCAN_CONFIG";

/// `[logging]` section shared by every foodscan config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter (`trace`, `debug`, `info`, `warn`, `error`, or a full EnvFilter directive)
    pub level: String,
    /// Emit ANSI colours in terminal output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Where a resolved config path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    PlatformDefault,
}

/// Resolves the config file for one module
pub struct ConfigPathResolver {
    module_name: String,
}

impl ConfigPathResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Resolve the config path, or `None` when no file is configured or present
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Some((path.to_path_buf(), ConfigSource::CommandLine));
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some((PathBuf::from(path), ConfigSource::Environment));
            }
        }

        // Priority 3: Platform config directory, only if the file exists
        let candidate = self.platform_config_path()?;
        if candidate.exists() {
            Some((candidate, ConfigSource::PlatformDefault))
        } else {
            debug!(path = %candidate.display(), "No config file at platform default location");
            None
        }
    }

    /// `<config_dir>/foodscan/<module>.toml`
    pub fn platform_config_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("foodscan").join(format!("{}.toml", self.module_name)))
    }
}

/// Load a TOML config file into `T`
///
/// Missing files yield `T::default()` with a warning; parse failures are errors.
pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(T::default());
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config file unreadable, using defaults");
            return Ok(T::default());
        }
    };

    let config = toml::from_str(&content).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to parse config file");
        e
    })?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Resolve and load in one step; returns defaults when nothing is configured
pub fn resolve_and_load<T>(resolver: &ConfigPathResolver, cli_arg: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match resolver.resolve(cli_arg) {
        Some((path, source)) => {
            debug!(path = %path.display(), source = ?source, "Resolved config path");
            load_toml_config(&path)
        }
        None => {
            info!("No config file configured, using compiled defaults");
            Ok(T::default())
        }
    }
}

/// Write a config atomically: serialize, write `<target>.tmp`, then rename over the target
///
/// The target is never observed half-written. On Unix the file is created
/// with mode 0600.
pub fn write_toml_config<T: Serialize>(config: &T, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    write_atomic(target, content.as_bytes())
}

/// Write bytes to `target` via a sibling temp file and rename
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path_for(target);
    std::fs::write(&tmp_path, bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&tmp_path, target) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::Io(e));
    }
    Ok(())
}

/// `<target>.tmp` next to the target
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}
