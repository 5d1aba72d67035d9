//! CO2 source resolution
//!
//! Extraction reports every CO2 source it found. Derived-metric calculation
//! needs exactly one per-100g figure, so this resolver applies a fixed
//! priority (the extraction order): the first source whose value lies in
//! `[0, 10000]` wins. Out-of-range values are skipped, not clamped.

use crate::models::{Co2Source, Co2Sources};
use crate::normalizers::unit_normalizer::round3;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Plausible range for a per-100g CO2 figure
pub const CO2_MIN: f64 = 0.0;
pub const CO2_MAX: f64 = 10_000.0;

/// The winning CO2 figure and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCo2 {
    pub per_100g: f64,
    pub source: Co2Source,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Co2Resolver;

impl Co2Resolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, sources: &Co2Sources) -> Option<ResolvedCo2> {
        for (source, value) in sources.iter() {
            match value {
                Some(v) if (CO2_MIN..=CO2_MAX).contains(&v) => {
                    return Some(ResolvedCo2 {
                        per_100g: round3(v),
                        source,
                    });
                }
                Some(v) => trace!(source = %source, value = v, "CO2 value out of range, skipped"),
                None => {}
            }
        }
        None
    }
}
