//! Derived-metric calculation

pub mod derived_fields;

pub use derived_fields::{
    CalculationStats, DerivedFieldsCalculator, DerivedMetrics, ImpactLevel, TransportFactors,
};
