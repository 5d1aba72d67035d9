//! Batch workflow
//!
//! Loading a batch, running it through every stage, and summarising the result.

pub mod batch;
pub mod orchestrator;
pub mod readiness;
pub mod statistics;

pub use batch::{parse_batch, read_batch, RawBatch};
pub use orchestrator::{
    FinishedRecord, RecordOutcome, RecordPipeline, TransformationOrchestrator, TransformationReport,
};
pub use readiness::{ProductionReadiness, QualityGrade};
pub use statistics::{OutcomeStats, TransformationStats};
