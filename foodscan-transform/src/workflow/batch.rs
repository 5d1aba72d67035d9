//! Batch input loading
//!
//! Accepted shapes:
//! - JSON object `{ identifier → raw record }`
//! - JSON array of raw records, keyed by their `code`; records without a
//!   code get a positional key (`record-<n>`) and are rejected downstream
//!   for the missing barcode

use crate::error::{Result, TransformError};
use crate::models::RawRecord;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

pub type RawBatch = BTreeMap<String, RawRecord>;

pub fn parse_batch(value: Value) -> Result<RawBatch> {
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(id, record)| (id, RawRecord::new(record)))
            .collect()),
        Value::Array(items) => {
            let mut batch = RawBatch::new();
            for (position, item) in items.into_iter().enumerate() {
                let record = RawRecord::new(item);
                let id = record
                    .identifier()
                    .unwrap_or_else(|| format!("record-{}", position + 1));
                if batch.contains_key(&id) {
                    warn!(id = %id, position, "Repeated identifier in batch, keeping first occurrence");
                    continue;
                }
                batch.insert(id, record);
            }
            Ok(batch)
        }
        other => Err(TransformError::Input(format!(
            "expected a JSON object or array of records, found {}",
            json_type_name(&other)
        ))),
    }
}

pub async fn read_batch(path: &Path) -> Result<RawBatch> {
    let content = tokio::fs::read_to_string(path).await?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| TransformError::Input(format!("{}: {}", path.display(), e)))?;
    let batch = parse_batch(value)?;
    debug!(path = %path.display(), records = batch.len(), "Batch loaded");
    Ok(batch)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
