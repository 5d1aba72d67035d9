//! Nutri-Score Validator
//!
//! **Algorithm:**
//! 1. Presence gate: at least one of grade or score must be present;
//!    otherwise a single "missing" reason and nothing else
//! 2. Grade, if present: one of `A`-`E` after upper-casing
//! 3. Score, if present: inside `[-15, 40]`
//!
//! Rules 2 and 3 are independent and their reasons accumulate.

use crate::models::{ExtractedFields, ExtractionSuccess, ValidationVerdict};
use crate::validators::BusinessRule;
use serde::{Deserialize, Serialize};

pub const VALID_GRADES: [&str; 5] = ["A", "B", "C", "D", "E"];
pub const NUTRISCORE_MIN: i64 = -15;
pub const NUTRISCORE_MAX: i64 = 40;

pub const NUTRISCORE_MISSING_REASON: &str = "Missing nutriscore data (need grade OR score)";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NutriscoreDetails {
    pub has_grade: bool,
    pub has_score: bool,
    pub grade_value: Option<String>,
    pub score_value: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NutriscoreValidator;

impl NutriscoreValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_nutriscore(
        &self,
        fields: &ExtractedFields,
        success: &ExtractionSuccess,
    ) -> ValidationVerdict<NutriscoreDetails> {
        let grade = fields
            .nutriscore_grade
            .as_deref()
            .map(str::trim)
            .filter(|g| success.nutriscore_grade && !g.is_empty());
        let score = fields.nutriscore_score.filter(|_| success.nutriscore_score);

        let details = NutriscoreDetails {
            has_grade: grade.is_some(),
            has_score: score.is_some(),
            grade_value: grade.map(str::to_string),
            score_value: score,
        };

        if grade.is_none() && score.is_none() {
            return ValidationVerdict::from_reasons(
                vec![NUTRISCORE_MISSING_REASON.to_string()],
                Vec::new(),
                details,
            );
        }

        let mut reasons = Vec::new();
        if let Some(g) = grade {
            let upper = g.to_uppercase();
            if !VALID_GRADES.contains(&upper.as_str()) {
                reasons.push(format!(
                    "Invalid nutriscore grade: '{}' (must be one of A, B, C, D, E)",
                    g
                ));
            }
        }
        if let Some(s) = score {
            if s > NUTRISCORE_MAX {
                reasons.push(format!(
                    "Invalid nutriscore score: Score too high: {} (maximum: {})",
                    s, NUTRISCORE_MAX
                ));
            } else if s < NUTRISCORE_MIN {
                reasons.push(format!(
                    "Invalid nutriscore score: Score too low: {} (minimum: {})",
                    s, NUTRISCORE_MIN
                ));
            }
        }

        ValidationVerdict::from_reasons(reasons, Vec::new(), details)
    }
}

impl BusinessRule for NutriscoreValidator {
    type Details = NutriscoreDetails;

    fn name(&self) -> &'static str {
        "nutriscore"
    }

    fn validate(
        &self,
        fields: &ExtractedFields,
        success: &ExtractionSuccess,
    ) -> ValidationVerdict<NutriscoreDetails> {
        self.validate_nutriscore(fields, success)
    }
}
