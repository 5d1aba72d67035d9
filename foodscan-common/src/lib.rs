//! # Foodscan Common Library
//!
//! Shared code for the foodscan pipeline crates:
//! - Error type and result alias
//! - TOML configuration loading, path resolution and atomic writes
//! - Timestamp parsing and age arithmetic

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
