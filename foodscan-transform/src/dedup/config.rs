//! Deduplication configuration
//!
//! Loaded from the `[deduplication]` TOML section. Unknown strategy or stage
//! names fail deserialization, so a bad value is reported once at startup.

use crate::dedup::entry::EntryStatus;
use foodscan_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How candidates are compared against the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Duplicate iff the identifier was seen within its status TTL
    TimeBased,
    /// Duplicate iff the content hash is already known
    ContentBased,
    /// Pass-through
    Disabled,
}

impl DedupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupStrategy::TimeBased => "time_based",
            DedupStrategy::ContentBased => "content_based",
            DedupStrategy::Disabled => "disabled",
        }
    }
}

impl fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the pipeline the batch filter runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStage {
    /// On the extracted batch, before any rule is evaluated
    BeforeValidation,
    /// On the accepted batch only
    AfterValidation,
}

/// Named configuration bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPreset {
    Development,
    Production,
    Testing,
    RetryFocused,
}

impl FromStr for DedupPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "development" | "dev" => Ok(DedupPreset::Development),
            "production" | "prod" => Ok(DedupPreset::Production),
            "testing" | "test" => Ok(DedupPreset::Testing),
            "retry_focused" | "retry" => Ok(DedupPreset::RetryFocused),
            other => Err(Error::Config(format!(
                "Unknown deduplication preset '{}' (expected development, production, testing or retry_focused)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub enable_deduplication: bool,
    pub strategy: DedupStrategy,
    pub stage: DedupStage,
    /// TTL for `pending` and `unknown` entries
    pub dedup_window_hours: u64,
    pub validated_ttl_hours: u64,
    pub rejected_ttl_hours: u64,
    pub partial_ttl_hours: u64,
    /// Index file; `None` disables persistence and with it deduplication
    pub index_location: Option<PathBuf>,
    /// Log hit/miss summaries after each batch
    pub enable_monitoring: bool,
    /// Retry budget for one index load or save
    pub io_max_wait_ms: u64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            enable_deduplication: true,
            strategy: DedupStrategy::TimeBased,
            stage: DedupStage::BeforeValidation,
            dedup_window_hours: 24,
            validated_ttl_hours: 2160,
            rejected_ttl_hours: 168,
            partial_ttl_hours: 720,
            index_location: None,
            enable_monitoring: true,
            io_max_wait_ms: crate::utils::DEFAULT_MAX_WAIT_MS,
        }
    }
}

impl DedupConfig {
    /// Build a preset; index location and stage keep their defaults
    pub fn preset(preset: DedupPreset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Overwrite strategy and TTLs from a preset, keeping index location and stage
    pub fn apply_preset(&mut self, preset: DedupPreset) {
        match preset {
            DedupPreset::Development => {
                self.enable_deduplication = false;
                self.strategy = DedupStrategy::Disabled;
                self.enable_monitoring = true;
            }
            DedupPreset::Production => {
                self.enable_deduplication = true;
                self.strategy = DedupStrategy::TimeBased;
                self.dedup_window_hours = 24;
                self.validated_ttl_hours = 2160;
                self.rejected_ttl_hours = 168;
                self.partial_ttl_hours = 720;
                self.enable_monitoring = true;
            }
            DedupPreset::Testing => {
                self.enable_deduplication = false;
                self.strategy = DedupStrategy::Disabled;
                self.enable_monitoring = false;
            }
            DedupPreset::RetryFocused => {
                self.enable_deduplication = true;
                self.strategy = DedupStrategy::TimeBased;
                self.dedup_window_hours = 6;
                self.validated_ttl_hours = 4320;
                self.rejected_ttl_hours = 72;
                self.partial_ttl_hours = 336;
                self.enable_monitoring = true;
            }
        }
    }

    /// Filtering happens only when enabled, not `disabled`, and an index is configured
    pub fn is_active(&self) -> bool {
        self.enable_deduplication
            && self.strategy != DedupStrategy::Disabled
            && self.index_location.is_some()
    }

    /// TTL in hours for entries with `status`
    pub fn ttl_hours(&self, status: EntryStatus) -> u64 {
        match status {
            EntryStatus::Validated => self.validated_ttl_hours,
            EntryStatus::Rejected => self.rejected_ttl_hours,
            EntryStatus::Partial => self.partial_ttl_hours,
            EntryStatus::Pending | EntryStatus::Unknown => self.dedup_window_hours,
        }
    }

    /// Reject configurations that would make every entry expire immediately
    pub fn validate(&self) -> Result<()> {
        let ttls = [
            ("dedup_window_hours", self.dedup_window_hours),
            ("validated_ttl_hours", self.validated_ttl_hours),
            ("rejected_ttl_hours", self.rejected_ttl_hours),
            ("partial_ttl_hours", self.partial_ttl_hours),
        ];
        for (name, hours) in ttls {
            if hours == 0 {
                return Err(Error::Config(format!("{} must be greater than zero", name)));
            }
        }
        Ok(())
    }
}
