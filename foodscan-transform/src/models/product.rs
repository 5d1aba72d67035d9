//! Normalized and finished product records

use crate::calculators::{DerivedMetrics, ImpactLevel};
use crate::models::extracted_fields::{Co2Source, Co2Sources, ExtractedFields};
use crate::validators::QualityReport;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Version stamp written on every output record
pub const TRANSFORMATION_VERSION: &str = "2.1";

/// Days until a stored record should be refreshed from upstream
pub const CACHE_EXPIRY_DAYS: i64 = 30;

/// An accepted record after cleaning and unit conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub barcode: String,
    pub product_name: String,
    pub brand_name: String,
    pub brand_tags: Vec<String>,
    /// Weight converted to grams, `None` when unknown or out of range
    pub weight_grams: Option<f64>,
    /// Canonical unit token (`g`, `kg`, `ml`, ...)
    pub unit: String,
    /// Unit as extracted, before canonicalization
    pub raw_unit: Option<String>,
    pub nutriscore_grade: Option<String>,
    pub nutriscore_score: Option<i64>,
    pub eco_score: Option<String>,
    /// Resolved per-100g CO2 figure fed to derived-metric calculation
    pub co2_per_100g: Option<f64>,
    /// Which source `co2_per_100g` came from
    pub co2_source: Option<Co2Source>,
}

/// Derived metric columns; all `None` together when metrics could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedColumns {
    pub co2_total_grams: Option<f64>,
    pub co2_car_km: Option<f64>,
    pub co2_train_km: Option<f64>,
    pub co2_bus_km: Option<f64>,
    pub co2_plane_km: Option<f64>,
    pub impact_level: Option<ImpactLevel>,
}

impl From<Option<&DerivedMetrics>> for DerivedColumns {
    fn from(metrics: Option<&DerivedMetrics>) -> Self {
        match metrics {
            Some(m) => Self {
                co2_total_grams: Some(m.co2_total_grams),
                co2_car_km: Some(m.co2_car_km),
                co2_train_km: Some(m.co2_train_km),
                co2_bus_km: Some(m.co2_bus_km),
                co2_plane_km: Some(m.co2_plane_km),
                impact_level: Some(m.impact_level),
            },
            None => Self::default(),
        }
    }
}

/// System bookkeeping attached to every output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cache_expires_at: DateTime<Utc>,
    pub collection_timestamp: DateTime<Utc>,
    pub transformation_version: String,
}

impl SystemMetadata {
    pub fn new(now: DateTime<Utc>, collection_timestamp: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            cache_expires_at: now + Duration::days(CACHE_EXPIRY_DAYS),
            collection_timestamp,
            transformation_version: TRANSFORMATION_VERSION.to_string(),
        }
    }
}

/// Flat record handed to the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(flatten)]
    pub product: NormalizedProduct,
    pub co2_sources: Co2Sources,
    #[serde(flatten)]
    pub derived: DerivedColumns,
    #[serde(flatten)]
    pub metadata: SystemMetadata,
    pub quality: QualityReport,
    /// Non-fatal validation warnings
    pub validation_warnings: Vec<String>,
}

/// A record that failed validation or the final quality check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub identifier: String,
    pub rejection_reasons: Vec<String>,
    pub warnings: Vec<String>,
    pub partial_data: ExtractedFields,
    pub validation_timestamp: DateTime<Utc>,
}
