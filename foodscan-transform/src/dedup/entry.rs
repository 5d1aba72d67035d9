//! Persisted deduplication index entries

use chrono::{DateTime, Utc};
use foodscan_common::time::hours_between;
use foodscan_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Last known validation outcome of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Validated,
    Rejected,
    Partial,
    Unknown,
}

impl EntryStatus {
    pub const ALL: [EntryStatus; 5] = [
        EntryStatus::Pending,
        EntryStatus::Validated,
        EntryStatus::Rejected,
        EntryStatus::Partial,
        EntryStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Validated => "validated",
            EntryStatus::Rejected => "rejected",
            EntryStatus::Partial => "partial",
            EntryStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        EntryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown entry status '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationEntry {
    pub last_seen_timestamp: DateTime<Utc>,
    pub first_seen_timestamp: DateTime<Utc>,
    pub seen_count: u64,
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
}

impl DeduplicationEntry {
    /// First sighting: `pending`, seen once
    pub fn first_seen(at: DateTime<Utc>, content_hash: Option<String>) -> Self {
        Self {
            last_seen_timestamp: at,
            first_seen_timestamp: at,
            seen_count: 1,
            status: EntryStatus::Pending,
            content_hash,
            status_updated_at: None,
        }
    }

    /// Hours since `last_seen_timestamp`
    pub fn age_hours(&self, reference: DateTime<Utc>) -> f64 {
        hours_between(self.last_seen_timestamp, reference)
    }

    /// Record another non-duplicate sighting; status and first sighting are kept
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_seen_timestamp = at;
        self.seen_count += 1;
    }

    pub fn set_status(&mut self, status: EntryStatus, at: DateTime<Utc>) {
        self.status = status;
        self.status_updated_at = Some(at);
    }
}

/// Identifier → entry
pub type DedupIndex = BTreeMap<String, DeduplicationEntry>;
