//! Utility modules

pub mod io_retry;

pub use io_retry::{retry_io, DEFAULT_MAX_WAIT_MS};
