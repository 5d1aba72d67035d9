//! Dedup index persistence
//!
//! The whole index is one JSON object `{ identifier → entry }`, read in full
//! and rewritten in full.
//!
//! **Load** never fails: a missing file, an unreadable file or malformed
//! JSON all yield an empty index (malformed individual entries are dropped).
//! **Save** writes `<index>.tmp` and renames it over the index, so readers
//! see either the previous or the new index, never a partial one. Both go
//! through [`retry_io`].

use crate::dedup::entry::{DedupIndex, DeduplicationEntry};
use crate::utils::retry_io;
use foodscan_common::config::write_atomic;
use foodscan_common::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
    max_wait_ms: u64,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>, max_wait_ms: u64) -> Self {
        Self {
            path: path.into(),
            max_wait_ms,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> DedupIndex {
        let path = &self.path;
        let content = retry_io("dedup index load", self.max_wait_ms, || async move {
            match tokio::fs::read_to_string(path).await {
                Ok(content) => Ok(Some(content)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(Error::Io(e)),
            }
        })
        .await;

        let content = match content {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!(path = %path.display(), "No dedup index yet, starting empty");
                return DedupIndex::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Dedup index unreadable, starting empty");
                return DedupIndex::new();
            }
        };

        parse_index(path, &content)
    }

    pub async fn save(&self, index: &DedupIndex) -> Result<()> {
        let bytes = Arc::new(serde_json::to_vec_pretty(index)?);
        let path = &self.path;

        retry_io("dedup index save", self.max_wait_ms, || {
            let bytes = Arc::clone(&bytes);
            let target = path.clone();
            async move {
                tokio::task::spawn_blocking(move || write_atomic(&target, &bytes))
                    .await
                    .map_err(|e| Error::Internal(format!("Index write task failed: {}", e)))?
            }
        })
        .await?;

        debug!(path = %path.display(), entries = index.len(), "Dedup index saved");
        Ok(())
    }
}

fn parse_index(path: &Path, content: &str) -> DedupIndex {
    let raw: Map<String, Value> = match serde_json::from_str(content) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Dedup index malformed, starting empty");
            return DedupIndex::new();
        }
    };

    let mut index = DedupIndex::new();
    let mut dropped = 0usize;
    for (id, value) in raw {
        match serde_json::from_value::<DeduplicationEntry>(value) {
            Ok(entry) => {
                index.insert(id, entry);
            }
            Err(e) => {
                dropped += 1;
                debug!(id = %id, error = %e, "Dropping malformed dedup entry");
            }
        }
    }
    if dropped > 0 {
        warn!(path = %path.display(), dropped, "Malformed dedup entries dropped");
    }
    debug!(path = %path.display(), entries = index.len(), "Dedup index loaded");
    index
}
