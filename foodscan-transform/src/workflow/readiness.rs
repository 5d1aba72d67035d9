//! Production readiness assessment
//!
//! A validated record is *complete* when it has barcode, product name, brand
//! name, a resolved CO2 figure, and a Nutri-Score grade or score.
//!
//! **Thresholds:**
//! - Grade on success rate: A ≥95, B ≥85, C ≥75, D ≥65, else F
//! - Launch ready: ≥100 complete records at ≥80%
//! - Minimum viable dataset: ≥50 complete records at ≥70%

use crate::models::OutputRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityGrade {
    A,
    B,
    C,
    D,
    F,
}

impl QualityGrade {
    pub fn for_success_rate(rate: f64) -> Self {
        if rate >= 95.0 {
            QualityGrade::A
        } else if rate >= 85.0 {
            QualityGrade::B
        } else if rate >= 75.0 {
            QualityGrade::C
        } else if rate >= 65.0 {
            QualityGrade::D
        } else {
            QualityGrade::F
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            QualityGrade::A => "A",
            QualityGrade::B => "B",
            QualityGrade::C => "C",
            QualityGrade::D => "D",
            QualityGrade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionReadiness {
    pub total_records_processed: usize,
    pub validated_records: usize,
    pub rejected_records: usize,
    pub complete_records: usize,
    /// Complete records as a percentage of processed records
    pub success_rate: f64,
    pub data_quality_grade: QualityGrade,
    pub launch_ready: bool,
    pub minimum_viable_dataset: bool,
    pub next_steps: Vec<String>,
}

impl ProductionReadiness {
    pub fn assess<'a, I>(validated: I, rejected_count: usize) -> Self
    where
        I: IntoIterator<Item = &'a OutputRecord>,
    {
        let mut validated_count = 0usize;
        let mut complete = 0usize;
        for record in validated {
            validated_count += 1;
            if is_complete(record) {
                complete += 1;
            }
        }
        Self::from_counts(validated_count, rejected_count, complete)
    }

    pub fn from_counts(validated: usize, rejected: usize, complete: usize) -> Self {
        let total = validated + rejected;
        let success_rate = if total == 0 {
            0.0
        } else {
            complete as f64 / total as f64 * 100.0
        };

        Self {
            total_records_processed: total,
            validated_records: validated,
            rejected_records: rejected,
            complete_records: complete,
            success_rate,
            data_quality_grade: QualityGrade::for_success_rate(success_rate),
            launch_ready: complete >= 100 && success_rate >= 80.0,
            minimum_viable_dataset: complete >= 50 && success_rate >= 70.0,
            next_steps: next_steps(complete, success_rate),
        }
    }

    pub fn display_string(&self) -> String {
        let status = if self.launch_ready {
            "launch ready"
        } else if self.minimum_viable_dataset {
            "limited"
        } else {
            "not ready"
        };
        format!(
            "{} of {} records complete ({:.1}%), grade {}, {}",
            self.complete_records,
            self.total_records_processed,
            self.success_rate,
            self.data_quality_grade,
            status
        )
    }
}

fn is_complete(record: &OutputRecord) -> bool {
    let p = &record.product;
    !p.barcode.is_empty()
        && !p.product_name.is_empty()
        && !p.brand_name.is_empty()
        && p.co2_per_100g.is_some()
        && (p.nutriscore_grade.is_some() || p.nutriscore_score.is_some())
}

fn next_steps(complete: usize, success_rate: f64) -> Vec<String> {
    let steps: [&str; 3] = if complete >= 100 && success_rate >= 85.0 {
        [
            "Ready for production deployment",
            "Load validated products into the product database",
            "Begin front-end integration and testing",
        ]
    } else if complete >= 50 && success_rate >= 70.0 {
        [
            "Minimum viable dataset achieved",
            "Address rejection reasons to improve quality",
            "Test with a limited product set before full deployment",
        ]
    } else {
        [
            "Dataset not ready for production",
            "Review and fix validation failures",
            "Improve the extraction pipeline before transformation",
        ]
    };
    steps.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(QualityGrade::for_success_rate(95.0), QualityGrade::A);
        assert_eq!(QualityGrade::for_success_rate(94.9), QualityGrade::B);
        assert_eq!(QualityGrade::for_success_rate(85.0), QualityGrade::B);
        assert_eq!(QualityGrade::for_success_rate(75.0), QualityGrade::C);
        assert_eq!(QualityGrade::for_success_rate(65.0), QualityGrade::D);
        assert_eq!(QualityGrade::for_success_rate(64.9), QualityGrade::F);
    }

    #[test]
    fn test_launch_ready() {
        // 115 / 130 = 88.5%
        let r = ProductionReadiness::from_counts(120, 10, 115);
        assert!(r.launch_ready);
        assert!(r.minimum_viable_dataset);
        assert_eq!(r.data_quality_grade, QualityGrade::B);
        assert_eq!(r.next_steps[0], "Ready for production deployment");
    }

    #[test]
    fn test_launch_ready_below_deployment_threshold() {
        // 110 / 130 = 84.6%: launch ready, but next steps need 85%
        let r = ProductionReadiness::from_counts(120, 10, 110);
        assert!(r.launch_ready);
        assert_eq!(r.data_quality_grade, QualityGrade::C);
        assert_eq!(r.next_steps[0], "Minimum viable dataset achieved");
    }

    #[test]
    fn test_minimum_viable_only() {
        let r = ProductionReadiness::from_counts(60, 15, 55);
        assert!(!r.launch_ready);
        assert!(r.minimum_viable_dataset);
        assert_eq!(r.next_steps[0], "Minimum viable dataset achieved");
    }

    #[test]
    fn test_empty_batch_not_ready() {
        let r = ProductionReadiness::from_counts(0, 0, 0);
        assert_eq!(r.success_rate, 0.0);
        assert_eq!(r.data_quality_grade, QualityGrade::F);
        assert!(!r.minimum_viable_dataset);
        assert_eq!(r.next_steps.len(), 3);
    }
}
