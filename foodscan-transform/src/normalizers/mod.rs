//! Normalization stage
//!
//! Canonical units, CO2 source resolution and product cleaning.

pub mod co2_resolver;
pub mod product_cleaner;
pub mod unit_normalizer;

pub use co2_resolver::{Co2Resolver, ResolvedCo2, CO2_MAX, CO2_MIN};
pub use product_cleaner::{CleaningStats, ProductCleaner};
pub use unit_normalizer::{round3, CanonicalUnit, UnitKind, UnitNormalizer};
