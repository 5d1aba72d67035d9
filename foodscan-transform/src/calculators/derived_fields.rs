//! Derived Fields Calculator
//!
//! Computes total CO2 impact, transport-equivalent distances and an impact
//! tier for one validated product.
//!
//! **Precondition:** the per-100g CO2 input is a single figure already
//! resolved by [`Co2Resolver`](crate::normalizers::Co2Resolver). This
//! calculator never chooses between CO2 sources.
//!
//! **Algorithm:**
//! 1. `co2_total_grams = co2_per_100g * weight_grams / 100`
//! 2. Distance per vehicle = `co2_total_grams / grams_per_km`, rounded to 3 decimals
//! 3. Tier on the unrounded total: `≤500` LOW, `≤1500` MEDIUM, `≤3000` HIGH, else VERY_HIGH
//!
//! The result is all-or-nothing: `None` when either input is missing.

use crate::models::NormalizedProduct;
use crate::normalizers::round3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Emission factors in grams of CO2 per kilometre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportFactors {
    pub car: f64,
    pub train: f64,
    pub bus: f64,
    pub plane: f64,
}

impl TransportFactors {
    pub const DEFAULT: TransportFactors = TransportFactors {
        car: 120.0,
        train: 14.0,
        bus: 68.0,
        plane: 255.0,
    };
}

impl Default for TransportFactors {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Ordered impact tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ImpactLevel {
    /// Tier for a total in grams; upper band edges are inclusive
    pub fn for_total(co2_total_grams: f64) -> Self {
        if co2_total_grams <= 500.0 {
            ImpactLevel::Low
        } else if co2_total_grams <= 1500.0 {
            ImpactLevel::Medium
        } else if co2_total_grams <= 3000.0 {
            ImpactLevel::High
        } else {
            ImpactLevel::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "LOW",
            ImpactLevel::Medium => "MEDIUM",
            ImpactLevel::High => "HIGH",
            ImpactLevel::VeryHigh => "VERY_HIGH",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All derived metrics of one product; exists only as a whole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub co2_total_grams: f64,
    pub co2_car_km: f64,
    pub co2_train_km: f64,
    pub co2_bus_km: f64,
    pub co2_plane_km: f64,
    pub impact_level: ImpactLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationStats {
    pub metrics_computed: usize,
    pub skipped_missing_weight: usize,
    pub skipped_missing_co2: usize,
}

impl CalculationStats {
    pub fn record(&mut self, product: &NormalizedProduct, metrics: Option<&DerivedMetrics>) {
        if metrics.is_some() {
            self.metrics_computed += 1;
            return;
        }
        if product.weight_grams.is_none() {
            self.skipped_missing_weight += 1;
        }
        if product.co2_per_100g.is_none() {
            self.skipped_missing_co2 += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedFieldsCalculator {
    factors: TransportFactors,
}

impl DerivedFieldsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factors(factors: TransportFactors) -> Self {
        Self { factors }
    }

    pub fn compute(
        &self,
        weight_grams: Option<f64>,
        co2_per_100g: Option<f64>,
    ) -> Option<DerivedMetrics> {
        let (weight, co2) = match (weight_grams, co2_per_100g) {
            (Some(w), Some(c)) => (w, c),
            _ => {
                trace!(?weight_grams, ?co2_per_100g, "Derived metrics skipped");
                return None;
            }
        };

        let total = co2 * weight / 100.0;
        Some(DerivedMetrics {
            co2_total_grams: round3(total),
            co2_car_km: round3(total / self.factors.car),
            co2_train_km: round3(total / self.factors.train),
            co2_bus_km: round3(total / self.factors.bus),
            co2_plane_km: round3(total / self.factors.plane),
            impact_level: ImpactLevel::for_total(total),
        })
    }

    pub fn compute_for(&self, product: &NormalizedProduct) -> Option<DerivedMetrics> {
        self.compute(product.weight_grams, product.co2_per_100g)
    }
}
