//! Validation verdicts
//!
//! A verdict is valid exactly when it carries no rejection reasons; the
//! constructors enforce that, so `is_valid` can never disagree with the
//! reason list. Warnings are informational and never affect validity.

use serde::{Deserialize, Serialize};

/// Result of one business-rule group, with rule-specific echoed `details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict<D> {
    pub is_valid: bool,
    pub rejection_reasons: Vec<String>,
    pub warnings: Vec<String>,
    pub details: D,
}

impl<D> ValidationVerdict<D> {
    /// Build a verdict from accumulated reasons
    pub fn from_reasons(rejection_reasons: Vec<String>, warnings: Vec<String>, details: D) -> Self {
        Self {
            is_valid: rejection_reasons.is_empty(),
            rejection_reasons,
            warnings,
            details,
        }
    }

    /// Accepting verdict
    pub fn accept(details: D) -> Self {
        Self::from_reasons(Vec::new(), Vec::new(), details)
    }

    /// Drop the details, keeping validity, reasons and warnings
    pub fn summary(&self) -> ValidationVerdict<()> {
        ValidationVerdict {
            is_valid: self.is_valid,
            rejection_reasons: self.rejection_reasons.clone(),
            warnings: self.warnings.clone(),
            details: (),
        }
    }
}

impl ValidationVerdict<()> {
    /// Logical AND of two verdicts; reasons and warnings are concatenated in order
    pub fn and<D>(mut self, other: &ValidationVerdict<D>) -> Self {
        self.rejection_reasons
            .extend(other.rejection_reasons.iter().cloned());
        self.warnings.extend(other.warnings.iter().cloned());
        self.is_valid = self.is_valid && other.is_valid && self.rejection_reasons.is_empty();
        self
    }
}
