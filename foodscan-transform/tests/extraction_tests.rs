//! Integration tests for field extraction, unit normalization and cleaning
//!
//! Covers fallback chains over realistic raw records and the hand-off from
//! extraction to the cleaner.

use foodscan_transform::extractors::{ExtractionStats, FieldExtractor};
use foodscan_transform::models::{Co2Source, RawRecord};
use foodscan_transform::normalizers::{CleaningStats, ProductCleaner};
use serde_json::json;

fn extract(value: serde_json::Value) -> foodscan_transform::models::ExtractedFields {
    FieldExtractor::new().extract_all(&RawRecord::new(value))
}

// ============================================================================
// Fallback chains
// ============================================================================

#[test]
fn test_french_name_preferred() {
    let fields = extract(json!({
        "code": "3017620422003",
        "product_name": "Hazelnut spread",
        "product_name_fr": "Pâte à tartiner aux noisettes"
    }));
    assert_eq!(fields.product_name.as_deref(), Some("Pâte à tartiner aux noisettes"));
}

#[test]
fn test_brand_from_tags_when_brands_missing() {
    let fields = extract(json!({
        "code": "1",
        "brands_tags": ["lu-france", "mondelez"]
    }));
    assert_eq!(fields.brand_name.as_deref(), Some("Lu France"));
    assert_eq!(fields.brand_tags, vec!["lu-france", "mondelez"]);
}

#[test]
fn test_numeric_barcode_becomes_text() {
    let fields = extract(json!({"code": 5449000000996u64}));
    assert_eq!(fields.barcode.as_deref(), Some("5449000000996"));
    assert!(fields.extraction_success.barcode);
}

#[test]
fn test_structured_quantity_beats_free_text() {
    let fields = extract(json!({
        "product_quantity": 750,
        "product_quantity_unit": "ML",
        "quantity": "1 l"
    }));
    assert_eq!(fields.weight, Some(750.0));
    assert_eq!(fields.unit.as_deref(), Some("ml"));
}

#[test]
fn test_quantity_text_fallback() {
    let fields = extract(json!({"product_quantity": "unknown", "quantity": "2 x 125 g"}));
    assert_eq!(fields.weight, Some(250.0));
    assert_eq!(fields.unit.as_deref(), Some("g"));
}

#[test]
fn test_nutriscore_nested_object_first() {
    let fields = extract(json!({
        "nutriscore": {"grade": "b", "score": 2},
        "nutriscore_grade": "d",
        "nutriscore_score": 15
    }));
    assert_eq!(fields.nutriscore_grade.as_deref(), Some("B"));
    assert_eq!(fields.nutriscore_score, Some(2));
}

#[test]
fn test_all_co2_sources_reported() {
    let fields = extract(json!({
        "agribalyse": {"co2_total": 0.9},
        "ecoscore_data": {"agribalyse": {"co2_total": 1.1}},
        "nutriments": {"carbon-footprint_100g": 85.0}
    }));
    assert_eq!(fields.co2_sources.get(Co2Source::AgribalyseTotal), Some(0.9));
    assert_eq!(fields.co2_sources.get(Co2Source::EcoscoreAgribalyseTotal), Some(1.1));
    assert_eq!(fields.co2_sources.get(Co2Source::NutrimentsCarbonFootprint), Some(85.0));
    assert_eq!(fields.co2_sources.get(Co2Source::NutrimentsKnownIngredients), None);
}

#[test]
fn test_empty_record_extracts_nothing() {
    let fields = extract(json!({}));
    assert!(fields.barcode.is_none());
    assert!(fields.product_name.is_none());
    assert!(fields.weight.is_none());
    assert!(!fields.co2_sources.any_present());
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_extraction_stats_success_rates() {
    let extractor = FieldExtractor::new();
    let mut stats = ExtractionStats::default();
    for record in [
        json!({"code": "1", "product_name": "A"}),
        json!({"code": "2"}),
    ] {
        let fields = extractor.extract_all(&RawRecord::new(record));
        stats.record(&fields.extraction_success);
    }
    assert_eq!(stats.records_processed, 2);
    assert_eq!(stats.success_rate("barcode"), 100.0);
    assert_eq!(stats.success_rate("product_name"), 50.0);
}

// ============================================================================
// Extraction → cleaning
// ============================================================================

#[test]
fn test_cleaned_product_in_grams() {
    let fields = extract(json!({
        "code": "3017620422003",
        "product_name": "  Nutella   pâte  à tartiner ",
        "brands": "Ferrero, Nutella",
        "quantity": "1,5 kg",
        "agribalyse": {"co2_total": 0.5}
    }));
    let mut stats = CleaningStats::default();
    let product = ProductCleaner::new().clean("3017620422003", &fields, &mut stats);

    assert_eq!(product.product_name, "Nutella pâte à tartiner");
    assert_eq!(product.brand_name, "Ferrero");
    assert_eq!(product.weight_grams, Some(1500.0));
    assert_eq!(product.unit, "kg");
    assert_eq!(product.co2_per_100g, Some(0.5));
    assert_eq!(product.co2_source, Some(Co2Source::AgribalyseTotal));
    assert_eq!(stats.products_cleaned, 1);
    assert_eq!(stats.primary_brands_extracted, 1);
}
