//! Records, per-page outcomes, and run aggregation
//!
//! This module defines the typed results of a scrape run:
//! - `PassRecord`: one parsed pass-prediction row
//! - `PageResult`/`PageOutcome`: the classified outcome of one page
//! - `ScrapeReport`: the aggregated, deduplicated, ordered run result
//!
//! Aggregation is a pure function of the page results; it performs no I/O.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One predicted overhead pass, parsed from a single table row
///
/// All fields are flat scalars. Two records describe the same pass when
/// their (date, rise_time, sat_id) keys match, regardless of which page
/// they were scraped from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    /// Satellite catalog id this pass belongs to
    pub sat_id: u32,

    /// Local date of the pass
    pub date: NaiveDate,

    /// Peak visual magnitude (lower is brighter)
    pub magnitude: f64,

    /// Time the satellite rises above the visibility threshold
    pub rise_time: NaiveTime,

    /// Altitude at rise, in degrees
    pub rise_altitude: u16,

    /// Compass azimuth at rise (e.g. "SSW")
    pub rise_azimuth: String,

    /// Time of the highest point of the pass
    pub culmination_time: NaiveTime,

    /// Altitude at culmination, in degrees
    pub culmination_altitude: u16,

    /// Compass azimuth at culmination
    pub culmination_azimuth: String,

    /// Time the satellite drops below the visibility threshold
    pub set_time: NaiveTime,

    /// Altitude at set, in degrees
    pub set_altitude: u16,

    /// Compass azimuth at set
    pub set_azimuth: String,

    /// Pass duration in seconds, set minus rise
    pub duration_seconds: u32,
}

impl PassRecord {
    /// Returns the identity key used for cross-page deduplication
    pub fn dedup_key(&self) -> (NaiveDate, NaiveTime, u32) {
        (self.date, self.rise_time, self.sat_id)
    }

    /// Returns the chronological sort key
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.rise_time)
    }
}

/// Classified outcome of fetching and parsing one page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page yielded at least one parsed record
    Ok(Vec<PassRecord>),

    /// The page was well-formed but contained no pass rows
    Empty,

    /// The page was fetched but its table could not be parsed
    ParseFailed(String),

    /// The page could not be fetched
    TransportFailed(String),
}

impl PageOutcome {
    /// Returns true for outcomes that count as page-level failures
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PageOutcome::ParseFailed(_) | PageOutcome::TransportFailed(_)
        )
    }

    /// Returns the parsed records, if any
    pub fn records(&self) -> &[PassRecord] {
        match self {
            PageOutcome::Ok(records) => records,
            _ => &[],
        }
    }
}

/// The outcome of exactly one page of a run, tagged with its page index
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// 1-based page index
    pub page: u32,

    /// What happened on this page
    pub outcome: PageOutcome,
}

/// Overall status of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every page was fetched and parsed (or legitimately empty)
    Success,

    /// At least one page failed, but records were still gathered
    PartialSuccess,

    /// At least one page failed and no records were gathered at all
    Failure,
}

impl RunStatus {
    /// Stable lowercase name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::PartialSuccess => "partial-success",
            RunStatus::Failure => "failure",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The terminal aggregate of one scrape run
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    /// Satellite catalog id the run scraped
    pub sat_id: u32,

    /// Deduplicated records in chronological order
    pub records: Vec<PassRecord>,

    /// One entry per page, ordered by page index
    pub pages: Vec<PageResult>,

    /// Overall run status
    pub status: RunStatus,
}

impl ScrapeReport {
    /// Returns the number of pages that ended in a failure outcome
    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_failure()).count()
    }
}

/// Aggregates per-page results into a final report
///
/// Concatenates records from `Ok` pages in page order, deduplicates by
/// (date, rise_time, sat_id) keeping the first occurrence, sorts
/// chronologically, and computes the overall status:
///
/// - `Success` when no page failed
/// - `PartialSuccess` when some page failed but records were gathered
/// - `Failure` when some page failed and no records were gathered
///
/// Aggregating the same input twice yields the same report.
pub fn aggregate(sat_id: u32, mut pages: Vec<PageResult>) -> ScrapeReport {
    pages.sort_by_key(|p| p.page);

    let mut seen: HashSet<(NaiveDate, NaiveTime, u32)> = HashSet::new();
    let mut records: Vec<PassRecord> = Vec::new();

    for page in &pages {
        for record in page.outcome.records() {
            if seen.insert(record.dedup_key()) {
                records.push(record.clone());
            }
        }
    }

    records.sort_by_key(|r| r.sort_key());

    let any_failure = pages.iter().any(|p| p.outcome.is_failure());
    let status = if !any_failure {
        RunStatus::Success
    } else if records.is_empty() {
        RunStatus::Failure
    } else {
        RunStatus::PartialSuccess
    };

    ScrapeReport {
        sat_id,
        records,
        pages,
        status,
    }
}
