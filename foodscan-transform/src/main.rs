//! foodscan-transform - Product Record Transformation
//!
//! **Commands:**
//! - `run`: transform one input batch and write the report
//! - `cache-stats`: summarise the dedup index
//! - `report-status`: record a downstream outcome for one barcode
//! - `retry-list`: list barcodes whose last outcome was `rejected`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use foodscan_common::config::write_atomic;
use foodscan_common::time;
use foodscan_transform::dedup::{DedupPreset, Deduplicator, EntryStatus};
use foodscan_transform::workflow::read_batch;
use foodscan_transform::{TransformConfig, TransformError, TransformationOrchestrator};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "foodscan-transform",
    version,
    about = "Transform raw product records into validated records"
)]
struct Cli {
    /// Configuration file (TOML); falls back to FOODSCAN_CONFIG, then the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dedup preset applied over the configured deduplication settings
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transform a batch of raw records
    Run {
        /// JSON object or array of raw records
        #[arg(long)]
        input: PathBuf,
        /// Report destination; printed to stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
        /// Collection timestamp (RFC 3339); defaults to now
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Print dedup index statistics
    CacheStats,
    /// Record a validation outcome for one identifier
    ReportStatus {
        id: String,
        /// pending | validated | rejected | partial | unknown
        status: String,
    },
    /// List identifiers whose last outcome was rejected
    RetryList,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TransformConfig::load(cli.config.as_deref())?;
    if let Some(name) = &cli.preset {
        let preset: DedupPreset = name.parse()?;
        config = config.with_preset(preset);
        config.validate()?;
    }

    init_tracing(&config)?;
    info!("foodscan-transform {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Run {
            input,
            output,
            timestamp,
        } => run(&config, &input, output.as_deref(), timestamp.as_deref()).await,
        Command::CacheStats => {
            let dedup = open_index(&config).await?;
            println!("{}", serde_json::to_string_pretty(&dedup.cache_stats())?);
            Ok(())
        }
        Command::ReportStatus { id, status } => {
            let status: EntryStatus = status.parse()?;
            let mut dedup = open_index(&config).await?;
            dedup.report_status(&id, status, time::now()).await;
            info!(id = %id, status = %status, "Status recorded");
            Ok(())
        }
        Command::RetryList => {
            let dedup = open_index(&config).await?;
            for id in dedup.rejected_for_retry() {
                println!("{}", id);
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &TransformConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.logging.ansi)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run(
    config: &TransformConfig,
    input: &Path,
    output: Option<&Path>,
    timestamp: Option<&str>,
) -> Result<()> {
    let collection_timestamp = match timestamp {
        Some(raw) => time::parse_timestamp(raw)?,
        None => time::now(),
    };

    let batch = read_batch(input)
        .await
        .with_context(|| format!("Failed to read batch {}", input.display()))?;
    let mut orchestrator = TransformationOrchestrator::from_config(config).await?;
    let report = orchestrator.run_batch(batch, collection_timestamp).await?;

    for line in report.statistics.summary_lines() {
        info!("{}", line);
    }
    info!("Readiness: {}", report.production_readiness.display_string());

    let json = serde_json::to_vec_pretty(&report)?;
    match output {
        Some(path) => {
            write_atomic(path, &json)?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", String::from_utf8_lossy(&json)),
    }
    Ok(())
}

async fn open_index(config: &TransformConfig) -> Result<Deduplicator> {
    if config.deduplication.index_location.is_none() {
        bail!(TransformError::IndexUnavailable(
            "deduplication.index_location is not set".to_string()
        ));
    }
    Ok(Deduplicator::open(config.deduplication.clone()).await)
}
