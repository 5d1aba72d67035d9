//! foodscan-transform library interface
//!
//! Turns raw product records from the open food database into validated,
//! normalized records with CO2-derived metrics.
//!
//! **Stages:** extract → deduplicate → validate → clean → derive → quality check

pub mod calculators;
pub mod config;
pub mod dedup;
pub mod error;
pub mod extractors;
pub mod models;
pub mod normalizers;
pub mod utils;
pub mod validators;
pub mod workflow;

pub use crate::config::TransformConfig;
pub use crate::error::{Result, TransformError};
pub use crate::workflow::{TransformationOrchestrator, TransformationReport};
