//! Output sinks for scraped pass records
//!
//! A sink persists the aggregated record list in a stable, re-readable
//! format (one file per target) and can read it back for downstream
//! consumers and round-trip tests.

mod json;

pub use json::JsonFileSink;

use crate::report::{PassRecord, ScrapeReport};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting or re-reading records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for report sinks
///
/// A sink owns the mapping from target id to destination and guarantees
/// the destination is flushed and released on every exit path.
pub trait ReportSink {
    /// Persists the report's deduplicated record list
    ///
    /// # Returns
    ///
    /// The path the records were written to
    fn write_report(&self, report: &ScrapeReport) -> SinkResult<PathBuf>;

    /// Reads a previously written record list back
    fn read_records(&self, sat_id: u32) -> SinkResult<Vec<PassRecord>>;
}
