//! Pass-table parser
//!
//! Extracts pass-prediction rows from one page's HTML. The upstream markup
//! is a versionless external contract, so extraction is deliberately
//! narrow: locate the table by its structural marker, require the expected
//! column count, and coerce cell-by-cell. Anything that deviates degrades
//! to a classified parse failure instead of silently wrong records.
//!
//! Row shape (11 data cells): date, magnitude, then time / altitude /
//! azimuth for each of rise, culmination, and set.

use crate::report::PassRecord;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Number of data cells a pass row must carry
const EXPECTED_CELLS: usize = 11;

/// Ways a page can fail to yield any records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableParseError {
    /// No pass table was found in the page at all; the upstream layout
    /// changed or an error page came back inside a 200 response
    #[error("structure not found")]
    StructureNotFound,

    /// A table with data rows was found, but not a single row coerced
    #[error("no recognizable rows")]
    NoRecognizableRows,
}

/// Parses the pass table out of one page of upstream HTML
///
/// Individual rows that fail coercion are skipped and counted, not fatal.
/// A present-but-empty table yields `Ok(vec![])`, the caller's Empty
/// case. Dates upstream carry only day and month; the year is inferred
/// from `base_date` (see [`infer_date`]).
///
/// # Arguments
///
/// * `html` - Raw page body
/// * `sat_id` - Satellite id stamped into each record
/// * `base_date` - Run date used for year inference
///
/// # Returns
///
/// * `Ok(records)` - Zero or more parsed rows
/// * `Err(TableParseError)` - Structure absent, or rows present but none parsed
pub fn parse_pass_table(
    html: &str,
    sat_id: u32,
    base_date: NaiveDate,
) -> Result<Vec<PassRecord>, TableParseError> {
    let document = Html::parse_document(html);

    let table = locate_pass_table(&document).ok_or(TableParseError::StructureNotFound)?;

    let row_selector = match Selector::parse("tr") {
        Ok(s) => s,
        Err(_) => return Err(TableParseError::StructureNotFound),
    };
    let cell_selector = match Selector::parse("td") {
        Ok(s) => s,
        Err(_) => return Err(TableParseError::StructureNotFound),
    };

    let mut records = Vec::new();
    let mut data_rows = 0usize;
    let mut skipped = 0usize;

    for row in table.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        // Header rows carry th cells and collect zero td here
        if cells.is_empty() {
            continue;
        }

        data_rows += 1;

        match parse_row(&cells, sat_id, base_date) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                tracing::warn!(
                    "Skipping unparseable pass row ({} cells): {:?}",
                    cells.len(),
                    cells.first()
                );
            }
        }
    }

    if data_rows > 0 && records.is_empty() {
        return Err(TableParseError::NoRecognizableRows);
    }

    if skipped > 0 {
        tracing::info!("Parsed {} rows, skipped {}", records.len(), skipped);
    }

    Ok(records)
}

/// Locates the pass table within the document
///
/// Prefers the upstream's `table.standardTable` marker; falls back to the
/// first table containing a row with the expected data-cell count, so a
/// dropped class attribute alone does not break the run.
fn locate_pass_table<'a>(document: &'a Html) -> Option<ElementRef<'a>> {
    if let Ok(marked) = Selector::parse("table.standardTable") {
        if let Some(table) = document.select(&marked).next() {
            return Some(table);
        }
    }

    let table_selector = Selector::parse("table").ok()?;
    let row_selector = Selector::parse("tr").ok()?;
    let cell_selector = Selector::parse("td").ok()?;

    document.select(&table_selector).find(|table| {
        table
            .select(&row_selector)
            .any(|row| row.select(&cell_selector).count() >= EXPECTED_CELLS)
    })
}

/// Coerces one row's cells into a record; None if anything fails
fn parse_row(cells: &[String], sat_id: u32, base_date: NaiveDate) -> Option<PassRecord> {
    if cells.len() < EXPECTED_CELLS {
        return None;
    }

    let date = infer_date(&cells[0], base_date)?;
    let magnitude: f64 = cells[1].parse().ok()?;

    let rise_time = parse_time(&cells[2])?;
    let rise_altitude = parse_degrees(&cells[3])?;
    let rise_azimuth = non_empty(&cells[4])?;

    let culmination_time = parse_time(&cells[5])?;
    let culmination_altitude = parse_degrees(&cells[6])?;
    let culmination_azimuth = non_empty(&cells[7])?;

    let set_time = parse_time(&cells[8])?;
    let set_altitude = parse_degrees(&cells[9])?;
    let set_azimuth = non_empty(&cells[10])?;

    Some(PassRecord {
        sat_id,
        date,
        magnitude,
        rise_time,
        rise_altitude,
        rise_azimuth,
        culmination_time,
        culmination_altitude,
        culmination_azimuth,
        set_time,
        set_altitude,
        set_azimuth,
        duration_seconds: duration_between(rise_time, set_time),
    })
}

/// Resolves a day+month cell ("05 Aug") against the run date
///
/// Predictions only look forward, so a parsed date falling more than 30
/// days before the base date belongs to the next year (a window crossing
/// December into January).
fn infer_date(cell: &str, base_date: NaiveDate) -> Option<NaiveDate> {
    let cell = cell.trim();

    let with_year = |year: i32| NaiveDate::parse_from_str(&format!("{} {}", cell, year), "%d %b %Y");

    let date = with_year(base_date.year())
        .or_else(|_| with_year(base_date.year() + 1))
        .ok()?;

    if base_date.signed_duration_since(date) > Duration::days(30) {
        date.with_year(date.year() + 1)
    } else {
        Some(date)
    }
}

/// Parses a time cell, with or without seconds
fn parse_time(cell: &str) -> Option<NaiveTime> {
    let cell = cell.trim();
    NaiveTime::parse_from_str(cell, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(cell, "%H:%M"))
        .ok()
}

/// Parses an altitude cell like "10°" into whole degrees
fn parse_degrees(cell: &str) -> Option<u16> {
    cell.trim().trim_end_matches('°').trim().parse().ok()
}

fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Seconds from rise to set, rolling over midnight when needed
fn duration_between(rise: NaiveTime, set: NaiveTime) -> u32 {
    let delta = set.signed_duration_since(rise).num_seconds();
    if delta >= 0 {
        delta as u32
    } else {
        (delta + 86_400) as u32
    }
}
