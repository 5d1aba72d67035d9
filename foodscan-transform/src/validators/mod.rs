//! Validation Layer
//!
//! # Validators
//! 1. **weight_validator** - Weight range and unit compatibility
//! 2. **nutriscore_validator** - Nutri-Score presence, grade and score range
//! 3. **product_validator** - Record-level gate (critical fields, CO2, then 1 and 2)
//! 4. **quality_checker** - Final database-readiness check on cleaned products
//!
//! Rule violations never surface as errors. They are rejection reasons on a
//! [`ValidationVerdict`].

pub mod nutriscore_validator;
pub mod product_validator;
pub mod quality_checker;
pub mod weight_validator;

use crate::models::{ExtractedFields, ExtractionSuccess, ValidationVerdict};

pub use nutriscore_validator::{
    NutriscoreDetails, NutriscoreValidator, NUTRISCORE_MAX, NUTRISCORE_MIN,
    NUTRISCORE_MISSING_REASON, VALID_GRADES,
};
pub use product_validator::{
    ProductDetails, ProductValidator, ProductVerdict, ValidationFailureStats,
    MISSING_BARCODE_REASON, MISSING_BRAND_REASON, MISSING_CO2_REASON,
    MISSING_PRODUCT_NAME_REASON,
};
pub use quality_checker::{IssueSeverity, IssueType, QualityChecker, QualityIssue, QualityReport};
pub use weight_validator::{
    WeightDetails, WeightValidator, MAX_WEIGHT_GRAMS, MIN_WEIGHT_GRAMS, WEIGHT_MISSING_WARNING,
};

/// A pure business-rule group over extracted fields
pub trait BusinessRule: Send + Sync {
    /// Rule-specific values echoed back on the verdict
    type Details;

    /// Rule group name for logging
    fn name(&self) -> &'static str;

    fn validate(
        &self,
        fields: &ExtractedFields,
        success: &ExtractionSuccess,
    ) -> ValidationVerdict<Self::Details>;
}
