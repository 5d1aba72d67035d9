//! Error types for foodscan-transform
//!
//! Record-level problems never appear here: malformed fields become `None`,
//! rule violations become rejection reasons, and index I/O failures are
//! logged. These variants cover startup and CLI failures only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// Invalid configuration, reported once at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dedup index required by a maintenance command is not configured
    #[error("Dedup index unavailable: {0}")]
    IndexUnavailable(String),

    /// Input batch file is not a JSON object or array of records
    #[error("Invalid input batch: {0}")]
    Input(String),

    /// A record worker panicked or was cancelled
    #[error("Worker failed: {0}")]
    Worker(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// foodscan-common error
    #[error("Common error: {0}")]
    Common(#[from] foodscan_common::Error),
}

pub type Result<T> = std::result::Result<T, TransformError>;
