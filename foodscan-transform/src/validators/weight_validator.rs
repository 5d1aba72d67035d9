//! Weight Validator
//!
//! # Rules
//! 1. **Availability**: missing weight is a warning only; the remaining
//!    rules are skipped and `weight_available` is `false`
//! 2. **Range**: `0.1 ≤ weight_grams ≤ 10000` (both edges valid)
//! 3. **Unit compatibility**: a present unit token must be a weight or
//!    volume unit (counting or unknown tokens reject)
//!
//! Weight is compared in unrounded grams; only the reported
//! `weight_grams` is rounded to 3 decimals. A magnitude without a unit is already grams;
//! a magnitude with an unconvertible unit is compared as-is, and the unit
//! rule reports the unit.

use crate::models::{ExtractedFields, ExtractionSuccess, ValidationVerdict};
use crate::normalizers::{round3, UnitNormalizer};
use crate::validators::BusinessRule;
use serde::{Deserialize, Serialize};

pub const MIN_WEIGHT_GRAMS: f64 = 0.1;
pub const MAX_WEIGHT_GRAMS: f64 = 10_000.0;

pub const WEIGHT_MISSING_WARNING: &str = "Weight data missing or invalid";

/// Values the weight rules judged
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightDetails {
    pub weight_available: bool,
    pub weight_value: Option<f64>,
    pub unit_value: Option<String>,
    pub weight_grams: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeightValidator {
    units: UnitNormalizer,
}

impl WeightValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_weight(
        &self,
        fields: &ExtractedFields,
        success: &ExtractionSuccess,
    ) -> ValidationVerdict<WeightDetails> {
        let weight = match fields.weight {
            Some(w) if success.weight => w,
            _ => {
                return ValidationVerdict::from_reasons(
                    Vec::new(),
                    vec![WEIGHT_MISSING_WARNING.to_string()],
                    WeightDetails {
                        unit_value: fields.unit.clone(),
                        ..Default::default()
                    },
                );
            }
        };

        let unit = fields.unit.as_deref();
        let grams = unit
            .and_then(|u| self.units.exact_grams(weight, u))
            .unwrap_or(weight);

        let mut reasons = Vec::new();
        if let Err(problem) = check_weight_range(grams) {
            reasons.push(format!("Invalid weight range: {}", problem));
        }
        if let Some(u) = unit {
            if !self.units.is_mass_compatible(u) {
                reasons.push(format!(
                    "Weight/unit incompatible: Unit '{}' is not a weight or volume unit",
                    u
                ));
            }
        }

        ValidationVerdict::from_reasons(
            reasons,
            Vec::new(),
            WeightDetails {
                weight_available: true,
                weight_value: Some(weight),
                unit_value: fields.unit.clone(),
                weight_grams: Some(round3(grams)),
            },
        )
    }
}

impl BusinessRule for WeightValidator {
    type Details = WeightDetails;

    fn name(&self) -> &'static str {
        "weight"
    }

    fn validate(
        &self,
        fields: &ExtractedFields,
        success: &ExtractionSuccess,
    ) -> ValidationVerdict<WeightDetails> {
        self.validate_weight(fields, success)
    }
}

fn check_weight_range(grams: f64) -> Result<(), String> {
    if grams < MIN_WEIGHT_GRAMS {
        Err(format!(
            "Weight too small: {}g (minimum: {}g)",
            grams, MIN_WEIGHT_GRAMS
        ))
    } else if grams > MAX_WEIGHT_GRAMS {
        Err(format!(
            "Weight too large: {}g (maximum: {}g)",
            grams, MAX_WEIGHT_GRAMS
        ))
    } else {
        Ok(())
    }
}
