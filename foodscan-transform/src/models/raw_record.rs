//! Untrusted upstream product document
//!
//! Raw records come straight from the food-database API. Keys may be
//! missing, `null`, or carry the wrong JSON type, so every accessor here
//! returns an `Option` and none of them can panic. All extraction logic is
//! written against these accessors only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw product document as received from upstream
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    /// Wrap any JSON value; non-object values behave like an empty document
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Non-null top-level value for `key`
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.path(&[key])
    }

    /// Walk nested objects; `None` as soon as a step is missing, null, or not an object
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        let mut current = &self.0;
        for key in keys {
            current = current.as_object()?.get(*key)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    /// Trimmed, non-empty string at `key`
    pub fn text(&self, key: &str) -> Option<String> {
        self.field(key).and_then(as_text)
    }

    /// Trimmed, non-empty string at a nested path
    pub fn text_at(&self, keys: &[&str]) -> Option<String> {
        self.path(keys).and_then(as_text)
    }

    /// Finite number (JSON number or numeric string) at a nested path
    pub fn number_at(&self, keys: &[&str]) -> Option<f64> {
        self.path(keys).and_then(as_number)
    }

    /// Integer at a nested path (see [`as_integer`])
    pub fn integer_at(&self, keys: &[&str]) -> Option<i64> {
        self.path(keys).and_then(as_integer)
    }

    /// String elements of the array at `key`; non-string elements are dropped
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.field(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Identifier for batch keys: the `code` field as text
    pub fn identifier(&self) -> Option<String> {
        self.field("code").and_then(as_identifier)
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Trimmed non-empty string; other JSON types are rejected
pub fn as_text(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// String or number rendered as text; zero and empty strings count as absent
pub fn as_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite float from a JSON number or numeric string
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Integer from a JSON integer, a float (truncated toward zero) or an integer string
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                let f = n.as_f64()?;
                if f.is_finite() && f.abs() < i64::MAX as f64 {
                    Some(f.trunc() as i64)
                } else {
                    None
                }
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
