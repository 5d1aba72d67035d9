//! Batch statistics
//!
//! Every counter is owned by the caller of a stage and merged here; no stage
//! keeps global counters.

use crate::calculators::CalculationStats;
use crate::dedup::DedupStats;
use crate::extractors::ExtractionStats;
use crate::normalizers::CleaningStats;
use crate::validators::ValidationFailureStats;
use serde::{Deserialize, Serialize};

/// Outcome counts for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStats {
    pub input_records: usize,
    pub duplicates_removed: usize,
    /// Accepted with derived metrics
    pub validated: usize,
    /// Accepted without derived metrics
    pub partial: usize,
    /// Rejected by validation or by the final quality check
    pub rejected: usize,
    pub quality_check_rejections: usize,
}

impl OutcomeStats {
    pub fn display_string(&self) -> String {
        format!(
            "{} records in, {} duplicates removed, {} validated, {} partial, {} rejected",
            self.input_records, self.duplicates_removed, self.validated, self.partial, self.rejected
        )
    }
}

impl ExtractionStats {
    pub fn display_string(&self) -> String {
        let fields: Vec<String> = self
            .field_successes
            .keys()
            .map(|field| format!("{} {:.0}%", field, self.success_rate(field)))
            .collect();
        format!(
            "{} records extracted ({})",
            self.records_processed,
            fields.join(", ")
        )
    }
}

impl ValidationFailureStats {
    pub fn display_string(&self) -> String {
        format!(
            "{} accepted, {} rejected (barcode {}, name {}, brand {}, weight {}, co2 {}, nutriscore {}, other {})",
            self.total_accepted,
            self.total_rejected,
            self.missing_barcode,
            self.missing_product_name,
            self.missing_brand,
            self.weight_issues,
            self.missing_co2,
            self.nutriscore_issues,
            self.invalid_data
        )
    }
}

impl CleaningStats {
    /// Fold another record's counters into this one
    pub fn merge(&mut self, other: CleaningStats) {
        self.products_cleaned += other.products_cleaned;
        self.product_names_cleaned += other.product_names_cleaned;
        self.product_names_truncated += other.product_names_truncated;
        self.brand_names_cleaned += other.brand_names_cleaned;
        self.primary_brands_extracted += other.primary_brands_extracted;
        self.units_normalized += other.units_normalized;
        self.weights_normalized += other.weights_normalized;
        self.weights_rejected += other.weights_rejected;
        self.data_quality_issues.extend(other.data_quality_issues);
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} products cleaned, {} names cleaned, {} primary brands extracted, {} units normalized, {} weights normalized",
            self.products_cleaned,
            self.product_names_cleaned,
            self.primary_brands_extracted,
            self.units_normalized,
            self.weights_normalized
        )
    }
}

impl CalculationStats {
    pub fn display_string(&self) -> String {
        format!(
            "{} derived metric sets, {} skipped (missing weight), {} skipped (missing CO2)",
            self.metrics_computed, self.skipped_missing_weight, self.skipped_missing_co2
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformationStats {
    pub outcome: OutcomeStats,
    pub extraction: ExtractionStats,
    pub validation: ValidationFailureStats,
    pub cleaning: CleaningStats,
    pub calculation: CalculationStats,
    pub deduplication: DedupStats,
    pub processing_ms: u64,
}

impl TransformationStats {
    /// One line per stage, for logs and the CLI summary
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Outcome: {}", self.outcome.display_string()),
            format!("Extraction: {}", self.extraction.display_string()),
            format!("Validation: {}", self.validation.display_string()),
            format!("Cleaning: {}", self.cleaning.display_string()),
            format!("Calculation: {}", self.calculation.display_string()),
            format!("Deduplication: {}", self.deduplication.display_string()),
        ]
    }
}
