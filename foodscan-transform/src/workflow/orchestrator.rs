//! Transformation Orchestrator
//!
//! Runs one batch through the whole chain.
//!
//! **Algorithm:**
//! 1. Extract every record (parallel)
//! 2. Deduplicate the extracted batch, when the stage is `before_validation`
//! 3. Validate (parallel)
//! 4. Deduplicate the accepted batch, when the stage is `after_validation`
//! 5. Clean, derive metrics, attach metadata, run the quality check (parallel)
//! 6. Report every outcome back to the deduplicator in one index write
//! 7. Assess production readiness
//!
//! Per-record work runs on `spawn_blocking` workers through a buffered
//! stream, `worker_count` at a time, in input order. Records without a
//! barcode skip deduplication and status reporting.

use crate::calculators::{CalculationStats, DerivedFieldsCalculator};
use crate::config::TransformConfig;
use crate::dedup::{DedupStage, Deduplicator, EntryStatus};
use crate::error::{Result, TransformError};
use crate::extractors::FieldExtractor;
use crate::models::{
    DerivedColumns, ExtractedFields, OutputRecord, RawRecord, RejectedRecord, SystemMetadata,
};
use crate::normalizers::{CleaningStats, ProductCleaner};
use crate::validators::{ProductValidator, ProductVerdict, QualityChecker};
use crate::workflow::readiness::ProductionReadiness;
use crate::workflow::statistics::TransformationStats;
use chrono::{DateTime, Utc};
use foodscan_common::time;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Final state of one accepted record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Accepted with derived metrics
    Validated(OutputRecord),
    /// Accepted, derived metrics unavailable
    Partial(OutputRecord),
    /// Failed the final quality check
    Rejected(RejectedRecord),
}

impl RecordOutcome {
    pub fn status(&self) -> EntryStatus {
        match self {
            RecordOutcome::Validated(_) => EntryStatus::Validated,
            RecordOutcome::Partial(_) => EntryStatus::Partial,
            RecordOutcome::Rejected(_) => EntryStatus::Rejected,
        }
    }
}

/// Result of cleaning and deriving one accepted record, with its counters
#[derive(Debug, Clone)]
pub struct FinishedRecord {
    pub outcome: RecordOutcome,
    pub cleaning: CleaningStats,
    pub calculation: CalculationStats,
}

/// The synchronous per-record chain
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordPipeline {
    extractor: FieldExtractor,
    validator: ProductValidator,
    cleaner: ProductCleaner,
    calculator: DerivedFieldsCalculator,
    checker: QualityChecker,
}

impl RecordPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, raw: &RawRecord) -> ExtractedFields {
        self.extractor.extract_all(raw)
    }

    pub fn validate(&self, fields: &ExtractedFields) -> ProductVerdict {
        self.validator.validate_product(fields)
    }

    /// Clean, derive and quality-check an accepted record
    pub fn finish(
        &self,
        id: &str,
        fields: ExtractedFields,
        warnings: Vec<String>,
        collection_timestamp: DateTime<Utc>,
    ) -> FinishedRecord {
        let mut cleaning = CleaningStats::default();
        let mut calculation = CalculationStats::default();

        let product = self.cleaner.clean(id, &fields, &mut cleaning);
        let metrics = self.calculator.compute_for(&product);
        calculation.record(&product, metrics.as_ref());
        let quality = self.checker.check(&product);

        let outcome = if !quality.database_ready {
            debug!(id, errors = quality.errors_count, "Quality check failed");
            RecordOutcome::Rejected(RejectedRecord {
                identifier: id.to_string(),
                rejection_reasons: quality.errors().map(|issue| issue.describe()).collect(),
                warnings,
                partial_data: fields,
                validation_timestamp: time::now(),
            })
        } else {
            let record = OutputRecord {
                co2_sources: fields.co2_sources,
                derived: DerivedColumns::from(metrics.as_ref()),
                metadata: SystemMetadata::new(time::now(), collection_timestamp),
                quality,
                validation_warnings: warnings,
                product,
            };
            if metrics.is_some() {
                RecordOutcome::Validated(record)
            } else {
                RecordOutcome::Partial(record)
            }
        };

        FinishedRecord {
            outcome,
            cleaning,
            calculation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub collection_timestamp: DateTime<Utc>,
    /// Accepted records, including partial ones
    pub validated: BTreeMap<String, OutputRecord>,
    /// Identifiers of accepted records without derived metrics
    pub partial: Vec<String>,
    pub rejected: BTreeMap<String, RejectedRecord>,
    pub duplicates_removed: Vec<String>,
    pub statistics: TransformationStats,
    pub production_readiness: ProductionReadiness,
}

pub struct TransformationOrchestrator {
    pipeline: RecordPipeline,
    dedup: Deduplicator,
    stage: DedupStage,
    worker_count: usize,
}

impl TransformationOrchestrator {
    /// Build from configuration, loading the dedup index if one is configured
    pub async fn from_config(config: &TransformConfig) -> Result<Self> {
        config.validate()?;
        let dedup = Deduplicator::open(config.deduplication.clone()).await;
        Ok(Self::new(dedup, config.pipeline.worker_count))
    }

    pub fn new(dedup: Deduplicator, worker_count: usize) -> Self {
        Self {
            pipeline: RecordPipeline::new(),
            stage: dedup.config().stage,
            dedup,
            worker_count: worker_count.max(1),
        }
    }

    pub fn deduplicator(&self) -> &Deduplicator {
        &self.dedup
    }

    pub fn deduplicator_mut(&mut self) -> &mut Deduplicator {
        &mut self.dedup
    }

    /// Transform one batch; `collection_timestamp` is also the dedup reference time
    pub async fn run_batch(
        &mut self,
        records: BTreeMap<String, RawRecord>,
        collection_timestamp: DateTime<Utc>,
    ) -> Result<TransformationReport> {
        let run_id = Uuid::new_v4();
        let started_at = time::now();
        let clock = Instant::now();
        let pipeline = self.pipeline;
        let workers = self.worker_count;

        info!(%run_id, records = records.len(), workers, "Transformation batch started");
        let mut stats = TransformationStats::default();
        stats.outcome.input_records = records.len();

        // 1. Extract
        let inputs: Vec<(String, RawRecord)> = records.into_iter().collect();
        let extracted = fan_out(inputs, workers, move |(id, raw): (String, RawRecord)| {
            let fields = pipeline.extract(&raw);
            (id, fields)
        })
        .await?;

        let mut candidates = BTreeMap::new();
        let mut unkeyed = Vec::new();
        for (id, fields) in extracted {
            stats.extraction.record(&fields.extraction_success);
            if fields.barcode.is_some() {
                candidates.insert(id, fields);
            } else {
                unkeyed.push((id, fields));
            }
        }

        // 2. Deduplicate before validation
        let mut duplicates_removed = Vec::new();
        if self.stage == DedupStage::BeforeValidation {
            candidates = self
                .deduplicate(candidates, collection_timestamp, &mut duplicates_removed)
                .await;
        }

        // 3. Validate
        let to_validate: Vec<(String, ExtractedFields)> =
            candidates.into_iter().chain(unkeyed).collect();
        let verdicts = fan_out(
            to_validate,
            workers,
            move |(id, fields): (String, ExtractedFields)| {
                let verdict = pipeline.validate(&fields);
                (id, fields, verdict)
            },
        )
        .await?;

        let mut accepted = BTreeMap::new();
        let mut warnings: HashMap<String, Vec<String>> = HashMap::new();
        let mut rejected = BTreeMap::new();
        let mut statuses = Vec::new();
        for (id, fields, verdict) in verdicts {
            stats.validation.record(&verdict);
            if verdict.is_valid {
                warnings.insert(id.clone(), verdict.warnings);
                accepted.insert(id, fields);
                continue;
            }
            debug!(id = %id, reasons = ?verdict.rejection_reasons, "Record rejected");
            if fields.barcode.is_some() {
                statuses.push((id.clone(), EntryStatus::Rejected));
            }
            rejected.insert(
                id.clone(),
                RejectedRecord {
                    identifier: id,
                    rejection_reasons: verdict.rejection_reasons,
                    warnings: verdict.warnings,
                    partial_data: fields,
                    validation_timestamp: time::now(),
                },
            );
        }

        // 4. Deduplicate after validation
        if self.stage == DedupStage::AfterValidation {
            accepted = self
                .deduplicate(accepted, collection_timestamp, &mut duplicates_removed)
                .await;
        }

        // 5. Clean, derive, check
        let to_finish: Vec<(String, ExtractedFields, Vec<String>)> = accepted
            .into_iter()
            .map(|(id, fields)| {
                let record_warnings = warnings.remove(&id).unwrap_or_default();
                (id, fields, record_warnings)
            })
            .collect();
        let finished = fan_out(
            to_finish,
            workers,
            move |(id, fields, record_warnings): (String, ExtractedFields, Vec<String>)| {
                let finished = pipeline.finish(&id, fields, record_warnings, collection_timestamp);
                (id, finished)
            },
        )
        .await?;

        let mut validated = BTreeMap::new();
        let mut partial = Vec::new();
        for (id, finished) in finished {
            stats.cleaning.merge(finished.cleaning);
            stats.calculation.metrics_computed += finished.calculation.metrics_computed;
            stats.calculation.skipped_missing_weight += finished.calculation.skipped_missing_weight;
            stats.calculation.skipped_missing_co2 += finished.calculation.skipped_missing_co2;

            statuses.push((id.clone(), finished.outcome.status()));
            match finished.outcome {
                RecordOutcome::Validated(record) => {
                    validated.insert(id, record);
                }
                RecordOutcome::Partial(record) => {
                    partial.push(id.clone());
                    validated.insert(id, record);
                }
                RecordOutcome::Rejected(record) => {
                    stats.outcome.quality_check_rejections += 1;
                    rejected.insert(id, record);
                }
            }
        }

        // 6. Status feedback
        self.dedup
            .report_statuses(statuses, collection_timestamp)
            .await;

        // 7. Readiness
        let production_readiness = ProductionReadiness::assess(validated.values(), rejected.len());

        stats.outcome.duplicates_removed = duplicates_removed.len();
        stats.outcome.validated = validated.len() - partial.len();
        stats.outcome.partial = partial.len();
        stats.outcome.rejected = rejected.len();
        stats.deduplication = self.dedup.stats().clone();
        stats.processing_ms = clock.elapsed().as_millis() as u64;

        info!(
            %run_id,
            validated = stats.outcome.validated,
            partial = stats.outcome.partial,
            rejected = stats.outcome.rejected,
            duplicates = stats.outcome.duplicates_removed,
            grade = %production_readiness.data_quality_grade,
            elapsed_ms = stats.processing_ms,
            "Transformation batch complete"
        );

        Ok(TransformationReport {
            run_id,
            started_at,
            completed_at: time::now(),
            collection_timestamp,
            validated,
            partial,
            rejected,
            duplicates_removed,
            statistics: stats,
            production_readiness,
        })
    }

    async fn deduplicate(
        &mut self,
        batch: BTreeMap<String, ExtractedFields>,
        reference: DateTime<Utc>,
        removed: &mut Vec<String>,
    ) -> BTreeMap<String, ExtractedFields> {
        let ids: Vec<String> = batch.keys().cloned().collect();
        let survivors = self.dedup.filter_duplicates(batch, reference).await;
        removed.extend(ids.into_iter().filter(|id| !survivors.contains_key(id)));
        survivors
    }
}

/// Run `work` over `items` on blocking workers, at most `workers` at a time, preserving order
async fn fan_out<I, O, F>(items: Vec<I>, workers: usize, work: F) -> Result<Vec<O>>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> O + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let results: Vec<_> = stream::iter(items.into_iter().map(|item| {
        let work = Arc::clone(&work);
        tokio::task::spawn_blocking(move || work(item))
    }))
    .buffered(workers.max(1))
    .collect()
    .await;

    results
        .into_iter()
        .map(|joined| joined.map_err(|e| TransformError::Worker(e.to_string())))
        .collect()
}
