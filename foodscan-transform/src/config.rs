//! Configuration for foodscan-transform
//!
//! **Priority:** CLI `--config` → `FOODSCAN_CONFIG` → platform config dir → compiled defaults
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [deduplication]
//! strategy = "time_based"
//! index_location = "/var/lib/foodscan/dedup_index.json"
//!
//! [pipeline]
//! worker_count = 4
//! ```

use crate::dedup::{DedupConfig, DedupPreset};
use crate::error::{Result, TransformError};
use foodscan_common::config::{resolve_and_load, ConfigPathResolver, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file stem under the platform config directory
pub const MODULE_NAME: &str = "transform";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Records processed concurrently
    pub worker_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub logging: LoggingConfig,
    pub deduplication: DedupConfig,
    pub pipeline: PipelineConfig,
}

impl TransformConfig {
    /// Resolve, load and validate the configuration
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let resolver = ConfigPathResolver::new(MODULE_NAME);
        let config: TransformConfig = resolve_and_load(&resolver, cli_path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_preset(mut self, preset: DedupPreset) -> Self {
        self.deduplication.apply_preset(preset);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pipeline.worker_count == 0 {
            return Err(TransformError::Config(
                "pipeline.worker_count must be at least 1".to_string(),
            ));
        }
        self.deduplication
            .validate()
            .map_err(|e| TransformError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::DedupStrategy;

    #[test]
    fn test_full_toml() {
        let config: TransformConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"

            [deduplication]
            enable_deduplication = true
            strategy = "content_based"
            stage = "after_validation"
            rejected_ttl_hours = 72
            index_location = "/tmp/foodscan/index.json"

            [pipeline]
            worker_count = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.deduplication.strategy, DedupStrategy::ContentBased);
        assert_eq!(config.deduplication.rejected_ttl_hours, 72);
        assert_eq!(config.deduplication.validated_ttl_hours, 2160);
        assert_eq!(config.pipeline.worker_count, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = TransformConfig::default();
        config.pipeline.worker_count = 0;
        assert!(matches!(config.validate(), Err(TransformError::Config(_))));
    }

    #[test]
    fn test_preset_applies_to_dedup_section() {
        let config = TransformConfig::default().with_preset(DedupPreset::RetryFocused);
        assert_eq!(config.deduplication.rejected_ttl_hours, 72);
    }
}
