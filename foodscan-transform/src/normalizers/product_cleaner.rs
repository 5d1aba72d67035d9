//! Product Cleaner
//!
//! Normalizes an accepted record into a [`NormalizedProduct`]:
//! - Product name: trimmed, whitespace collapsed, truncated to 200 characters
//! - Brand name: trimmed, whitespace collapsed, primary brand kept from a
//!   comma-separated list ("Ferrero, Nutella" → "Ferrero")
//! - Unit: canonical token, `g` when unknown or absent
//! - Weight: converted to grams, kept only inside the valid range
//! - Nutri-Score grade, score and eco-score: kept only when well-formed
//! - CO2: resolved to one per-100g figure
//!
//! Counters and data-quality notes go into a caller-owned [`CleaningStats`].

use crate::models::{ExtractedFields, NormalizedProduct};
use crate::normalizers::co2_resolver::Co2Resolver;
use crate::normalizers::unit_normalizer::{round3, UnitNormalizer};
use crate::validators::nutriscore_validator::{NUTRISCORE_MAX, NUTRISCORE_MIN, VALID_GRADES};
use crate::validators::weight_validator::{MAX_WEIGHT_GRAMS, MIN_WEIGHT_GRAMS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest product name kept verbatim
pub const MAX_PRODUCT_NAME_CHARS: usize = 200;

/// Cleaning counters for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningStats {
    pub products_cleaned: usize,
    pub product_names_cleaned: usize,
    pub product_names_truncated: usize,
    pub brand_names_cleaned: usize,
    pub primary_brands_extracted: usize,
    pub units_normalized: usize,
    pub weights_normalized: usize,
    pub weights_rejected: usize,
    pub data_quality_issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductCleaner {
    units: UnitNormalizer,
    co2: Co2Resolver,
}

impl ProductCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean one record; `identifier` stands in for a missing barcode
    pub fn clean(
        &self,
        identifier: &str,
        fields: &ExtractedFields,
        stats: &mut CleaningStats,
    ) -> NormalizedProduct {
        stats.products_cleaned += 1;
        let barcode = fields
            .barcode
            .clone()
            .unwrap_or_else(|| identifier.to_string());

        let product_name = self.clean_product_name(fields.product_name.as_deref(), stats);
        let brand_name = self.clean_brand_name(&barcode, fields.brand_name.as_deref(), stats);
        let unit = self.clean_unit(fields.unit.as_deref(), stats);
        let weight_grams = self.clean_weight(fields.weight, fields.unit.as_deref(), stats);
        let resolved = self.co2.resolve(&fields.co2_sources);

        NormalizedProduct {
            barcode,
            product_name,
            brand_name,
            brand_tags: fields.brand_tags.clone(),
            weight_grams,
            unit,
            raw_unit: fields.unit.clone(),
            nutriscore_grade: normalize_grade(fields.nutriscore_grade.as_deref()),
            nutriscore_score: fields
                .nutriscore_score
                .filter(|s| (NUTRISCORE_MIN..=NUTRISCORE_MAX).contains(s)),
            eco_score: normalize_grade(fields.eco_score.as_deref()),
            co2_per_100g: resolved.map(|r| r.per_100g),
            co2_source: resolved.map(|r| r.source),
        }
    }

    fn clean_product_name(&self, raw: Option<&str>, stats: &mut CleaningStats) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        let mut cleaned = collapse_whitespace(raw);
        let char_count = cleaned.chars().count();
        if char_count > MAX_PRODUCT_NAME_CHARS {
            cleaned = cleaned
                .chars()
                .take(MAX_PRODUCT_NAME_CHARS - 3)
                .chain("...".chars())
                .collect();
            stats.product_names_truncated += 1;
            stats
                .data_quality_issues
                .push(format!("Product name truncated: was {} chars", char_count));
        }
        if cleaned != raw {
            stats.product_names_cleaned += 1;
        }
        cleaned
    }

    fn clean_brand_name(&self, barcode: &str, raw: Option<&str>, stats: &mut CleaningStats) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        let collapsed = collapse_whitespace(raw);
        let primary = collapsed
            .split(',')
            .map(str::trim)
            .find(|part| !part.is_empty())
            .unwrap_or_default()
            .to_string();

        if primary != collapsed {
            stats.primary_brands_extracted += 1;
            debug!(barcode, from = %collapsed, to = %primary, "Primary brand extracted");
            if raw.chars().count() > 30 || raw.contains(',') {
                stats.data_quality_issues.push(format!(
                    "Brand transformed for {}: '{}' → '{}'",
                    barcode,
                    raw.chars().take(50).collect::<String>(),
                    primary
                ));
            }
        }
        if primary != raw {
            stats.brand_names_cleaned += 1;
        }
        primary
    }

    fn clean_unit(&self, raw: Option<&str>, stats: &mut CleaningStats) -> String {
        let canonical = raw
            .and_then(|u| self.units.normalize(u))
            .map(|u| u.as_str())
            .unwrap_or("g");
        if raw != Some(canonical) {
            stats.units_normalized += 1;
        }
        canonical.to_string()
    }

    fn clean_weight(&self, weight: Option<f64>, unit: Option<&str>, stats: &mut CleaningStats) -> Option<f64> {
        let weight = weight?;
        let grams = match unit {
            Some(u) => self.units.exact_grams(weight, u),
            None => Some(weight),
        };
        match grams {
            Some(g) if (MIN_WEIGHT_GRAMS..=MAX_WEIGHT_GRAMS).contains(&g) => {
                stats.weights_normalized += 1;
                Some(round3(g))
            }
            Some(g) => {
                stats.weights_rejected += 1;
                stats
                    .data_quality_issues
                    .push(format!("Weight outside valid range: {}g", g));
                None
            }
            None => {
                stats.weights_rejected += 1;
                stats.data_quality_issues.push(format!(
                    "Invalid weight value: {} {}",
                    weight,
                    unit.unwrap_or_default()
                ));
                None
            }
        }
    }
}

/// Trim and collapse internal whitespace runs to single spaces
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cased grade if it is one of A-E
fn normalize_grade(raw: Option<&str>) -> Option<String> {
    let upper = raw?.trim().to_uppercase();
    VALID_GRADES.contains(&upper.as_str()).then_some(upper)
}
