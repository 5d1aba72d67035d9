//! Field Extractor
//!
//! Applies per-field fallback chains over a [`RawRecord`] and produces one
//! candidate value per target field.
//!
//! **Fallback chains** (first non-empty value wins):
//! - `barcode`: `code`
//! - `product_name`: `product_name_fr` → `product_name`
//! - `brand_name`: `brands` → first `brands_tags` entry (title-cased) → `brands_imported`
//! - `weight`/`unit`: `product_quantity` + `product_quantity_unit` →
//!   [`WeightParser`] on `product_quantity` → [`WeightParser`] on `quantity`
//! - `nutriscore_grade`: `nutriscore.grade` → `nutriscore_grade` → `nutrition_grades`
//! - `nutriscore_score`: `nutriscore.score` → `nutriscore_score`
//! - `eco_score`: `ecoscore_grade`
//! - `co2_sources`: all four sources, each independently
//!
//! Extraction is a pure function of the record and never fails; a field that
//! cannot be resolved is `None` with its success flag `false`.

use crate::extractors::weight_parser::{ParsedQuantity, WeightParser};
use crate::models::{Co2Source, ExtractedFields, ExtractionSuccess, RawRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor {
    weight_parser: WeightParser,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract every target field from one raw record
    pub fn extract_all(&self, raw: &RawRecord) -> ExtractedFields {
        let (weight, unit) = self.extract_weight(raw);

        let mut fields = ExtractedFields {
            barcode: raw.identifier(),
            product_name: raw.text("product_name_fr").or_else(|| raw.text("product_name")),
            brand_name: self.extract_brand(raw),
            brand_tags: raw.string_list("brands_tags"),
            weight,
            unit,
            nutriscore_grade: raw
                .text_at(&["nutriscore", "grade"])
                .or_else(|| raw.text("nutriscore_grade"))
                .or_else(|| raw.text("nutrition_grades"))
                .map(|g| g.to_uppercase()),
            nutriscore_score: raw
                .integer_at(&["nutriscore", "score"])
                .or_else(|| raw.integer_at(&["nutriscore_score"])),
            eco_score: raw.text("ecoscore_grade").map(|g| g.to_uppercase()),
            ..Default::default()
        };

        for source in Co2Source::PRIORITY {
            fields.co2_sources.set(source, raw.number_at(co2_path(source)));
        }

        fields.extraction_success = ExtractionSuccess::from_fields(&fields);
        fields
    }

    fn extract_brand(&self, raw: &RawRecord) -> Option<String> {
        if let Some(brand) = raw.text("brands") {
            return Some(brand);
        }
        let from_tag = raw
            .string_list("brands_tags")
            .into_iter()
            .next()
            .map(|tag| title_case(&tag.replace(['-', '_'], " ")))
            .filter(|brand| !brand.is_empty());
        from_tag.or_else(|| raw.text("brands_imported"))
    }

    fn extract_weight(&self, raw: &RawRecord) -> ParsedQuantity {
        // Pre-normalized pair from upstream
        if let (Some(quantity), Some(unit)) = (
            raw.number_at(&["product_quantity"]),
            raw.text("product_quantity_unit"),
        ) {
            return (Some(quantity), Some(unit.to_lowercase()));
        }

        for key in ["product_quantity", "quantity"] {
            let parsed = self.weight_parser.parse(raw.field(key));
            if parsed.0.is_some() {
                return parsed;
            }
            trace!(key, "No weight from quantity field");
        }
        (None, None)
    }
}

/// Raw-record path for each CO2 source
fn co2_path(source: Co2Source) -> &'static [&'static str] {
    match source {
        Co2Source::AgribalyseTotal => &["agribalyse", "co2_total"],
        Co2Source::EcoscoreAgribalyseTotal => &["ecoscore_data", "agribalyse", "co2_total"],
        Co2Source::NutrimentsCarbonFootprint => &["nutriments", "carbon-footprint_100g"],
        Co2Source::NutrimentsKnownIngredients => {
            &["nutriments", "carbon-footprint-from-known-ingredients_100g"]
        }
    }
}

/// "ferrero  france" → "Ferrero France"
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-field extraction success counters, accumulated by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub records_processed: usize,
    pub field_successes: BTreeMap<String, usize>,
}

impl ExtractionStats {
    pub fn record(&mut self, success: &ExtractionSuccess) {
        self.records_processed += 1;
        for (field, ok) in success.entries() {
            let count = self.field_successes.entry(field.to_string()).or_insert(0);
            if ok {
                *count += 1;
            }
        }
    }

    /// Success percentage for one field (0.0 when nothing was processed)
    pub fn success_rate(&self, field: &str) -> f64 {
        if self.records_processed == 0 {
            return 0.0;
        }
        let hits = self.field_successes.get(field).copied().unwrap_or(0);
        hits as f64 / self.records_processed as f64 * 100.0
    }
}
