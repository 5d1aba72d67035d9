//! Product Validator
//!
//! Record-level gate combining every business rule.
//!
//! **Order of reasons:**
//! 1. Missing barcode
//! 2. Missing product name
//! 3. Missing brand name
//! 4. Missing CO2 data (no source present)
//! 5. Weight rule reasons
//! 6. Nutri-Score rule reasons
//!
//! The combined verdict is the logical AND of all groups. Nothing is
//! short-circuited, so a record collects every reason that applies.

use crate::models::{ExtractedFields, ValidationVerdict};
use crate::validators::nutriscore_validator::{NutriscoreDetails, NutriscoreValidator};
use crate::validators::weight_validator::{WeightDetails, WeightValidator};
use crate::validators::BusinessRule;
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const MISSING_BARCODE_REASON: &str = "Missing or invalid barcode (required for primary key)";
pub const MISSING_PRODUCT_NAME_REASON: &str = "Missing product name (required for bot display)";
pub const MISSING_BRAND_REASON: &str = "Missing brand name (required for bot display)";
pub const MISSING_CO2_REASON: &str = "Missing CO2 data (required for carbon footprint functionality)";

/// Echoed details from each rule group
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDetails {
    pub weight: WeightDetails,
    pub nutriscore: NutriscoreDetails,
}

pub type ProductVerdict = ValidationVerdict<ProductDetails>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductValidator {
    weight: WeightValidator,
    nutriscore: NutriscoreValidator,
}

impl ProductValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_product(&self, fields: &ExtractedFields) -> ProductVerdict {
        let success = &fields.extraction_success;

        let mut critical = Vec::new();
        if !success.barcode {
            critical.push(MISSING_BARCODE_REASON.to_string());
        }
        if !success.product_name {
            critical.push(MISSING_PRODUCT_NAME_REASON.to_string());
        }
        if !success.brand_name {
            critical.push(MISSING_BRAND_REASON.to_string());
        }
        if !success.co2_total {
            critical.push(MISSING_CO2_REASON.to_string());
        }

        let weight = self.weight.validate(fields, success);
        let nutriscore = self.nutriscore.validate(fields, success);
        trace!(
            barcode = fields.barcode.as_deref().unwrap_or(""),
            rule.weight = self.weight.name(),
            weight_valid = weight.is_valid,
            rule.nutriscore = self.nutriscore.name(),
            nutriscore_valid = nutriscore.is_valid,
            "Business rules evaluated"
        );

        let combined = ValidationVerdict::from_reasons(critical, Vec::new(), ())
            .and(&weight)
            .and(&nutriscore);

        ValidationVerdict::from_reasons(
            combined.rejection_reasons,
            combined.warnings,
            ProductDetails {
                weight: weight.details,
                nutriscore: nutriscore.details,
            },
        )
    }
}

/// Rejection reasons bucketed by the field they concern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailureStats {
    pub total_validated: usize,
    pub total_accepted: usize,
    pub total_rejected: usize,
    pub missing_barcode: usize,
    pub missing_product_name: usize,
    pub missing_brand: usize,
    pub weight_issues: usize,
    pub missing_co2: usize,
    pub nutriscore_issues: usize,
    pub invalid_data: usize,
}

impl ValidationFailureStats {
    pub fn record<D>(&mut self, verdict: &ValidationVerdict<D>) {
        self.total_validated += 1;
        if verdict.is_valid {
            self.total_accepted += 1;
            return;
        }
        self.total_rejected += 1;
        for reason in &verdict.rejection_reasons {
            self.classify(reason);
        }
    }

    fn classify(&mut self, reason: &str) {
        let lower = reason.to_lowercase();
        let bucket = if lower.contains("barcode") {
            &mut self.missing_barcode
        } else if lower.contains("product name") {
            &mut self.missing_product_name
        } else if lower.contains("brand") {
            &mut self.missing_brand
        } else if lower.contains("weight") {
            &mut self.weight_issues
        } else if lower.contains("co2") {
            &mut self.missing_co2
        } else if lower.contains("nutriscore") {
            &mut self.nutriscore_issues
        } else {
            &mut self.invalid_data
        };
        *bucket += 1;
    }

    /// Accepted percentage (0.0 when nothing was validated)
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_validated == 0 {
            0.0
        } else {
            self.total_accepted as f64 / self.total_validated as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Co2Source, ExtractionSuccess};

    fn complete() -> ExtractedFields {
        let mut fields = ExtractedFields {
            barcode: Some("3017620422003".into()),
            product_name: Some("Nutella".into()),
            brand_name: Some("Ferrero".into()),
            weight: Some(400.0),
            unit: Some("g".into()),
            nutriscore_grade: Some("E".into()),
            nutriscore_score: Some(26),
            ..Default::default()
        };
        fields.co2_sources.set(Co2Source::AgribalyseTotal, Some(0.5));
        fields.extraction_success = ExtractionSuccess::from_fields(&fields);
        fields
    }

    fn refresh(mut fields: ExtractedFields) -> ExtractedFields {
        fields.extraction_success = ExtractionSuccess::from_fields(&fields);
        fields
    }

    #[test]
    fn test_complete_record_accepted() {
        let v = ProductValidator::new().validate_product(&complete());
        assert!(v.is_valid, "{:?}", v.rejection_reasons);
        assert_eq!(v.details.weight.weight_grams, Some(400.0));
    }

    #[test]
    fn test_empty_record_reason_order() {
        let v = ProductValidator::new().validate_product(&ExtractedFields::default());
        assert!(!v.is_valid);
        assert_eq!(
            v.rejection_reasons,
            vec![
                MISSING_BARCODE_REASON,
                MISSING_PRODUCT_NAME_REASON,
                MISSING_BRAND_REASON,
                MISSING_CO2_REASON,
                "Missing nutriscore data (need grade OR score)",
            ]
        );
        assert_eq!(v.warnings, vec!["Weight data missing or invalid"]);
    }

    #[test]
    fn test_delegate_reasons_accumulate() {
        let mut fields = complete();
        fields.unit = Some("pieces".into());
        fields.nutriscore_score = Some(41);
        let v = ProductValidator::new().validate_product(&refresh(fields));
        assert_eq!(v.rejection_reasons.len(), 2);
        assert!(v.rejection_reasons[0].starts_with("Weight/unit incompatible"));
        assert!(v.rejection_reasons[1].starts_with("Invalid nutriscore score"));
    }

    #[test]
    fn test_failure_buckets() {
        let validator = ProductValidator::new();
        let mut stats = ValidationFailureStats::default();
        stats.record(&validator.validate_product(&complete()));
        stats.record(&validator.validate_product(&ExtractedFields::default()));

        assert_eq!(stats.total_validated, 2);
        assert_eq!(stats.total_accepted, 1);
        assert_eq!(stats.total_rejected, 1);
        assert_eq!(stats.missing_barcode, 1);
        assert_eq!(stats.missing_product_name, 1);
        assert_eq!(stats.missing_brand, 1);
        assert_eq!(stats.missing_co2, 1);
        assert_eq!(stats.nutriscore_issues, 1);
        assert_eq!(stats.weight_issues, 0);
        assert_eq!(stats.acceptance_rate(), 50.0);
    }
}
