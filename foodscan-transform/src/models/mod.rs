//! Data models for the transformation pipeline

pub mod extracted_fields;
pub mod product;
pub mod raw_record;
pub mod verdict;

pub use extracted_fields::{Co2Source, Co2Sources, ExtractedFields, ExtractionSuccess};
pub use product::{
    DerivedColumns, NormalizedProduct, OutputRecord, RejectedRecord, SystemMetadata,
    TRANSFORMATION_VERSION,
};
pub use raw_record::RawRecord;
pub use verdict::ValidationVerdict;
