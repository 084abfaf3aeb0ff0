//! JSON file sink
//!
//! Writes the aggregated record list as a pretty-printed JSON array at
//! `<root>/passes-<satid>.json`. The format is a flat array of flat
//! records so downstream consumers (a static site in the original
//! deployment) can re-read it across runs without version drift.

use crate::report::{PassRecord, ScrapeReport};
use crate::sink::{ReportSink, SinkError, SinkResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sink writing one JSON file per target under a root directory
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    root: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink rooted at the given output directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the deterministic destination path for a target
    pub fn target_path(&self, sat_id: u32) -> PathBuf {
        self.root.join(format!("passes-{}.json", sat_id))
    }
}

impl ReportSink for JsonFileSink {
    fn write_report(&self, report: &ScrapeReport) -> SinkResult<PathBuf> {
        std::fs::create_dir_all(&self.root).map_err(|source| SinkError::CreateDir {
            path: self.root.clone(),
            source,
        })?;

        let path = self.target_path(report.sat_id);
        let file = File::create(&path).map_err(|source| SinkError::Write {
            path: path.clone(),
            source,
        })?;

        // BufWriter releases the handle on every exit path; the explicit
        // flush surfaces late write errors instead of dropping them
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &report.records)?;
        writer.flush().map_err(|source| SinkError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    fn read_records(&self, sat_id: u32) -> SinkResult<Vec<PassRecord>> {
        let path = self.target_path(sat_id);
        let file = File::open(&path).map_err(|source| SinkError::Read {
            path: path.clone(),
            source,
        })?;

        let records = serde_json::from_reader(BufReader::new(file))?;
        Ok(records)
    }
}
