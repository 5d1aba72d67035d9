//! Batch Deduplicator
//!
//! Filters a batch of candidates against a persisted, status-aware index.
//!
//! **Algorithm (`filter_duplicates`):**
//! 1. Purge: remove every entry whose age exceeds its status TTL (runs even
//!    for an empty batch)
//! 2. Decide: classify each candidate against the index as loaded, without
//!    mutating it
//!    - time-based: duplicate iff `age_hours < TTL(status)`
//!    - content-based: duplicate iff the content hash is in the index or
//!      occurred earlier in the same batch; a record with no name, brand,
//!      weight or unit has no content hash and is never a duplicate
//! 3. Apply: write all accumulated updates in one pass
//! 4. Save: one atomic index write
//!
//! The deduplicator is the index's only writer. Other stages report
//! validation outcomes through [`Deduplicator::report_status`]; it never
//! decides validity itself.
//!
//! With no index location, a disabled strategy, or deduplication switched
//! off, every batch passes through untouched. Index I/O failures are logged
//! and never fail a batch.

use crate::dedup::config::{DedupConfig, DedupStrategy};
use crate::dedup::entry::{DedupIndex, DeduplicationEntry, EntryStatus};
use crate::dedup::index_store::IndexStore;
use crate::models::ExtractedFields;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Fields that define content identity
#[derive(Debug, Clone, PartialEq)]
pub struct ContentKey<'a> {
    pub product_name: Option<&'a str>,
    pub brand_name: Option<&'a str>,
    pub weight: Option<f64>,
    pub unit: Option<&'a str>,
}

impl ContentKey<'_> {
    /// No identifying field at all; such records never match on content
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.brand_name.is_none()
            && self.weight.is_none()
            && self.unit.is_none()
    }

    /// SHA-256 over canonical JSON of the normalized key, hex-encoded
    pub fn hash(&self) -> String {
        let normalize = |s: Option<&str>| s.map(|v| v.trim().to_lowercase());
        let canonical = (
            normalize(self.product_name),
            normalize(self.brand_name),
            self.weight,
            normalize(self.unit),
        );
        // Serializing a tuple of strings and floats cannot fail
        let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
        format!("{:x}", Sha256::digest(&bytes))
    }
}

/// Anything the deduplicator can filter
pub trait DedupCandidate {
    fn content_key(&self) -> ContentKey<'_>;
}

impl DedupCandidate for ExtractedFields {
    fn content_key(&self) -> ContentKey<'_> {
        ContentKey {
            product_name: self.product_name.as_deref(),
            brand_name: self.brand_name.as_deref(),
            weight: self.weight,
            unit: self.unit.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupStats {
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub total_requests: usize,
    pub expired_entries_cleaned: usize,
    pub save_failures: usize,
}

impl DedupStats {
    /// Hits as a percentage of requests
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64 * 100.0
        }
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} requests, {} duplicates skipped, {} new, {} expired entries cleaned",
            self.total_requests, self.cache_hits, self.cache_misses, self.expired_entries_cleaned
        )
    }
}

/// TTLs expressed in days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtlDays {
    pub validated: f64,
    pub rejected: f64,
    pub partial: f64,
    pub pending: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStatsReport {
    pub enabled: bool,
    pub strategy: DedupStrategy,
    pub index_location: Option<PathBuf>,
    pub total_entries: usize,
    pub hit_rate_percent: f64,
    pub status_breakdown: BTreeMap<String, usize>,
    pub ttl_days: TtlDays,
    pub stats: DedupStats,
}

enum PendingUpdate {
    Touch { id: String, hash: Option<String> },
    Insert { id: String, hash: Option<String> },
}

pub struct Deduplicator {
    config: DedupConfig,
    store: Option<IndexStore>,
    index: DedupIndex,
    stats: DedupStats,
}

impl Deduplicator {
    /// Build without touching disk; the index starts empty
    pub fn new(config: DedupConfig) -> Self {
        let store = config
            .index_location
            .as_ref()
            .map(|path| IndexStore::new(path, config.io_max_wait_ms));
        Self {
            config,
            store,
            index: DedupIndex::new(),
            stats: DedupStats::default(),
        }
    }

    /// Build and load the persisted index
    pub async fn open(config: DedupConfig) -> Self {
        let mut dedup = Self::new(config);
        if let Some(store) = &dedup.store {
            dedup.index = store.load().await;
            info!(
                path = %store.path().display(),
                entries = dedup.index.len(),
                strategy = %dedup.config.strategy,
                "Dedup index opened"
            );
        } else {
            debug!("No dedup index location configured, deduplication is pass-through");
        }
        dedup
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.config.is_active() && self.store.is_some()
    }

    pub fn index(&self) -> &DedupIndex {
        &self.index
    }

    pub fn stats(&self) -> &DedupStats {
        &self.stats
    }

    /// Return the non-duplicate subset of `batch`
    pub async fn filter_duplicates<T: DedupCandidate>(
        &mut self,
        batch: BTreeMap<String, T>,
        reference: DateTime<Utc>,
    ) -> BTreeMap<String, T> {
        if !self.is_active() {
            return batch;
        }

        let purged = self.purge_expired(reference);

        let mut known_hashes: HashSet<String> = HashSet::new();
        if self.config.strategy == DedupStrategy::ContentBased {
            known_hashes.extend(self.index.values().filter_map(|e| e.content_hash.clone()));
        }

        let mut survivors = BTreeMap::new();
        let mut updates = Vec::new();
        let mut hits = 0usize;

        for (id, candidate) in batch {
            let key = candidate.content_key();
            let hash = (!key.is_empty()).then(|| key.hash());
            let duplicate = match self.config.strategy {
                DedupStrategy::TimeBased => self.index.get(&id).is_some_and(|entry| {
                    entry.age_hours(reference) < self.config.ttl_hours(entry.status) as f64
                }),
                // `insert` is false when the hash was already known or seen earlier in this batch
                DedupStrategy::ContentBased => hash
                    .as_ref()
                    .is_some_and(|h| !known_hashes.insert(h.clone())),
                DedupStrategy::Disabled => false,
            };

            if duplicate {
                hits += 1;
                debug!(id = %id, strategy = %self.config.strategy, "Duplicate skipped");
                continue;
            }

            updates.push(match self.config.strategy {
                DedupStrategy::ContentBased => PendingUpdate::Insert { id: id.clone(), hash },
                _ => PendingUpdate::Touch { id: id.clone(), hash },
            });
            survivors.insert(id, candidate);
        }

        let misses = updates.len();
        self.stats.cache_hits += hits;
        self.stats.cache_misses += misses;
        self.stats.total_requests += hits + misses;

        for update in updates {
            self.apply(update, reference);
        }

        if purged > 0 || misses > 0 {
            self.persist().await;
        }

        if self.config.enable_monitoring {
            info!(
                requests = hits + misses,
                duplicates = hits,
                new = misses,
                purged,
                index_size = self.index.len(),
                "Deduplication batch complete"
            );
        }
        survivors
    }

    fn apply(&mut self, update: PendingUpdate, at: DateTime<Utc>) {
        match update {
            PendingUpdate::Touch { id, hash } => match self.index.get_mut(&id) {
                Some(entry) => {
                    entry.touch(at);
                    entry.content_hash = hash;
                }
                None => {
                    self.index.insert(id, DeduplicationEntry::first_seen(at, hash));
                }
            },
            PendingUpdate::Insert { id, hash } => match self.index.get_mut(&id) {
                Some(entry) => {
                    entry.touch(at);
                    entry.content_hash = hash;
                    entry.set_status(EntryStatus::Pending, at);
                }
                None => {
                    self.index.insert(id, DeduplicationEntry::first_seen(at, hash));
                }
            },
        }
    }

    /// Remove entries older than their status TTL; returns how many were removed
    pub fn purge_expired(&mut self, reference: DateTime<Utc>) -> usize {
        let config = &self.config;
        let before = self.index.len();
        self.index
            .retain(|_, entry| entry.age_hours(reference) <= config.ttl_hours(entry.status) as f64);
        let purged = before - self.index.len();
        if purged > 0 {
            debug!(purged, "Expired dedup entries purged");
        }
        self.stats.expired_entries_cleaned += purged;
        purged
    }

    /// Record a validation outcome and persist it
    pub async fn report_status(&mut self, id: &str, status: EntryStatus, at: DateTime<Utc>) {
        self.report_statuses([(id.to_string(), status)], at).await;
    }

    /// Record many outcomes with a single index write
    pub async fn report_statuses<I>(&mut self, outcomes: I, at: DateTime<Utc>)
    where
        I: IntoIterator<Item = (String, EntryStatus)>,
    {
        if self.store.is_none() || !self.config.enable_deduplication {
            return;
        }
        let mut changed = 0usize;
        for (id, status) in outcomes {
            self.index
                .entry(id)
                .or_insert_with(|| DeduplicationEntry::first_seen(at, None))
                .set_status(status, at);
            changed += 1;
        }
        if changed > 0 {
            debug!(changed, "Dedup statuses reported");
            self.persist().await;
        }
    }

    /// Identifiers whose last outcome was `rejected`
    pub fn rejected_for_retry(&self) -> Vec<String> {
        self.index
            .iter()
            .filter(|(_, entry)| entry.status == EntryStatus::Rejected)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn cache_stats(&self) -> CacheStatsReport {
        let mut status_breakdown: BTreeMap<String, usize> = EntryStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for entry in self.index.values() {
            *status_breakdown.entry(entry.status.as_str().to_string()).or_insert(0) += 1;
        }

        let days = |hours: u64| hours as f64 / 24.0;
        CacheStatsReport {
            enabled: self.is_active(),
            strategy: self.config.strategy,
            index_location: self.config.index_location.clone(),
            total_entries: self.index.len(),
            hit_rate_percent: self.stats.hit_rate(),
            status_breakdown,
            ttl_days: TtlDays {
                validated: days(self.config.validated_ttl_hours),
                rejected: days(self.config.rejected_ttl_hours),
                partial: days(self.config.partial_ttl_hours),
                pending: days(self.config.dedup_window_hours),
            },
            stats: self.stats.clone(),
        }
    }

    async fn persist(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.index).await {
            self.stats.save_failures += 1;
            warn!(
                path = %store.path().display(),
                error = %e,
                "Failed to save dedup index, continuing without persistence for this batch"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn fields(name: &str) -> ExtractedFields {
        ExtractedFields {
            product_name: Some(name.into()),
            brand_name: Some("Brand".into()),
            weight: Some(100.0),
            unit: Some("g".into()),
            ..Default::default()
        }
    }

    fn batch(ids: &[(&str, &str)]) -> BTreeMap<String, ExtractedFields> {
        ids.iter()
            .map(|(id, name)| (id.to_string(), fields(name)))
            .collect()
    }

    fn config(dir: &TempDir, strategy: DedupStrategy) -> DedupConfig {
        DedupConfig {
            strategy,
            index_location: Some(dir.path().join("index.json")),
            ..Default::default()
        }
    }

    #[test]
    fn test_content_hash_normalizes_case_and_space() {
        let a = fields(" Nutella ").content_key().hash();
        let b = fields("nutella").content_key().hash();
        assert_eq!(a, b);
        assert_ne!(a, fields("Kinder").content_key().hash());
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn test_pass_through_without_index() {
        let mut dedup = Deduplicator::open(DedupConfig::default()).await;
        let out = dedup.filter_duplicates(batch(&[("1", "a")]), t0()).await;
        assert_eq!(out.len(), 1);
        assert_eq!(dedup.stats().total_requests, 0);
    }

    #[tokio::test]
    async fn test_time_based_second_sighting_is_duplicate() {
        let dir = TempDir::new().unwrap();
        let mut dedup = Deduplicator::open(config(&dir, DedupStrategy::TimeBased)).await;

        let first = dedup.filter_duplicates(batch(&[("1", "a")]), t0()).await;
        assert_eq!(first.len(), 1);
        let entry = &dedup.index()["1"];
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.seen_count, 1);

        let second = dedup
            .filter_duplicates(batch(&[("1", "a"), ("2", "b")]), t0() + Duration::hours(1))
            .await;
        assert_eq!(second.keys().collect::<Vec<_>>(), vec!["2"]);
        assert_eq!(dedup.stats().cache_hits, 1);
        assert_eq!(dedup.stats().cache_misses, 2);
    }

    #[tokio::test]
    async fn test_content_based_catches_in_batch_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut dedup = Deduplicator::open(config(&dir, DedupStrategy::ContentBased)).await;

        let out = dedup
            .filter_duplicates(batch(&[("1", "same"), ("2", "same"), ("3", "other")]), t0())
            .await;
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["1", "3"]);

        let out = dedup.filter_duplicates(batch(&[("9", "other")]), t0()).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_content_based_keeps_records_without_key_fields() {
        let dir = TempDir::new().unwrap();
        let mut dedup = Deduplicator::open(config(&dir, DedupStrategy::ContentBased)).await;
        let bare: BTreeMap<String, ExtractedFields> = ["1", "2", "3"]
            .iter()
            .map(|id| (id.to_string(), ExtractedFields::default()))
            .collect();

        let out = dedup.filter_duplicates(bare.clone(), t0()).await;
        assert_eq!(out.len(), 3);
        assert!(dedup.index()["1"].content_hash.is_none());

        // Still not matched on a later run
        let out = dedup.filter_duplicates(bare, t0() + Duration::hours(1)).await;
        assert_eq!(out.len(), 3);
        assert_eq!(dedup.stats().cache_hits, 0);
    }

    #[tokio::test]
    async fn test_report_status_creates_missing_entry() {
        let dir = TempDir::new().unwrap();
        let mut dedup = Deduplicator::open(config(&dir, DedupStrategy::TimeBased)).await;
        dedup.report_status("42", EntryStatus::Rejected, t0()).await;

        let entry = &dedup.index()["42"];
        assert_eq!(entry.status, EntryStatus::Rejected);
        assert_eq!(entry.status_updated_at, Some(t0()));
        assert_eq!(dedup.rejected_for_retry(), vec!["42"]);
    }

    #[tokio::test]
    async fn test_cache_stats_breakdown() {
        let dir = TempDir::new().unwrap();
        let mut dedup = Deduplicator::open(config(&dir, DedupStrategy::TimeBased)).await;
        dedup.filter_duplicates(batch(&[("1", "a"), ("2", "b")]), t0()).await;
        dedup.report_status("2", EntryStatus::Validated, t0()).await;

        let report = dedup.cache_stats();
        assert!(report.enabled);
        assert_eq!(report.total_entries, 2);
        assert_eq!(report.status_breakdown["pending"], 1);
        assert_eq!(report.status_breakdown["validated"], 1);
        assert_eq!(report.status_breakdown["rejected"], 0);
        assert_eq!(report.ttl_days.validated, 90.0);
        assert_eq!(report.ttl_days.rejected, 7.0);
    }
}
