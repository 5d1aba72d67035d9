//! Deduplication against a persisted, status-aware index
//!
//! # Modules
//! - **config** - Strategy, stage, per-status TTLs, presets
//! - **entry** - Index entries and their lifecycle status
//! - **index_store** - Tolerant load, atomic save
//! - **deduplicator** - Batch filter, purge, status feedback, cache stats

pub mod config;
pub mod deduplicator;
pub mod entry;
pub mod index_store;

pub use config::{DedupConfig, DedupPreset, DedupStage, DedupStrategy};
pub use deduplicator::{
    CacheStatsReport, ContentKey, DedupCandidate, DedupStats, Deduplicator, TtlDays,
};
pub use entry::{DedupIndex, DeduplicationEntry, EntryStatus};
pub use index_store::IndexStore;
