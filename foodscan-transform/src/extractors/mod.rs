//! Extraction stage
//!
//! # Extractors
//! 1. **weight_parser** - Raw quantity → (magnitude, unit)
//! 2. **field_extractor** - Fallback chains over a raw record → `ExtractedFields`
//!
//! Neither extractor can fail. Unresolvable fields come back as `None`.

pub mod field_extractor;
pub mod weight_parser;

pub use field_extractor::{ExtractionStats, FieldExtractor};
pub use weight_parser::{ParsedQuantity, WeightParser};
