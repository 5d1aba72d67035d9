//! Final database-readiness check on a cleaned product
//!
//! # Checks
//! - **Errors**: empty barcode, product name or brand name
//! - **Warnings**: resolved CO2 figure outside the plausible range
//!
//! A product is database-ready iff the report carries no errors.

use crate::models::NormalizedProduct;
use crate::normalizers::{CO2_MAX, CO2_MIN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingCriticalField,
    Co2OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub issue_type: IssueType,
    pub field: String,
    pub severity: IssueSeverity,
}

impl QualityIssue {
    /// Human-readable form, used as a rejection reason
    pub fn describe(&self) -> String {
        match self.issue_type {
            IssueType::MissingCriticalField => format!("Missing critical field: {}", self.field),
            IssueType::Co2OutOfRange => format!("CO2 value out of range: {}", self.field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityReport {
    pub database_ready: bool,
    pub issues: Vec<QualityIssue>,
    pub warnings_count: usize,
    pub errors_count: usize,
}

impl QualityReport {
    pub fn errors(&self) -> impl Iterator<Item = &QualityIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QualityChecker;

impl QualityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, product: &NormalizedProduct) -> QualityReport {
        let mut issues = Vec::new();

        let critical = [
            ("barcode", &product.barcode),
            ("product_name", &product.product_name),
            ("brand_name", &product.brand_name),
        ];
        for (field, value) in critical {
            if value.trim().is_empty() {
                issues.push(QualityIssue {
                    issue_type: IssueType::MissingCriticalField,
                    field: field.to_string(),
                    severity: IssueSeverity::Error,
                });
            }
        }

        if let Some(co2) = product.co2_per_100g {
            if !(CO2_MIN..=CO2_MAX).contains(&co2) {
                issues.push(QualityIssue {
                    issue_type: IssueType::Co2OutOfRange,
                    field: "co2_per_100g".to_string(),
                    severity: IssueSeverity::Warning,
                });
            }
        }

        let errors_count = issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count();
        QualityReport {
            database_ready: errors_count == 0,
            warnings_count: issues.len() - errors_count,
            errors_count,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> NormalizedProduct {
        NormalizedProduct {
            barcode: "3017620422003".into(),
            product_name: "Nutella".into(),
            brand_name: "Ferrero".into(),
            brand_tags: vec![],
            weight_grams: Some(400.0),
            unit: "g".into(),
            raw_unit: Some("g".into()),
            nutriscore_grade: Some("E".into()),
            nutriscore_score: Some(26),
            eco_score: None,
            co2_per_100g: Some(0.5),
            co2_source: None,
        }
    }

    #[test]
    fn test_clean_product_is_ready() {
        let report = QualityChecker::new().check(&product());
        assert!(report.database_ready);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_missing_brand_is_error() {
        let mut p = product();
        p.brand_name = String::new();
        let report = QualityChecker::new().check(&p);
        assert!(!report.database_ready);
        assert_eq!(report.errors_count, 1);
        assert_eq!(
            report.errors().next().map(|i| i.describe()).as_deref(),
            Some("Missing critical field: brand_name")
        );
    }

    #[test]
    fn test_co2_out_of_range_is_warning() {
        let mut p = product();
        p.co2_per_100g = Some(12_000.0);
        let report = QualityChecker::new().check(&p);
        assert!(report.database_ready);
        assert_eq!(report.warnings_count, 1);
        assert_eq!(report.issues[0].issue_type, IssueType::Co2OutOfRange);
    }
}
