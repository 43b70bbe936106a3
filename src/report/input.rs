//! Reading a cleaned match log from CSV
//!
//! Expected header: `season,week,entity_a,entity_b,score_a,score_b`.
//! Blank score cells become missing scores and unparseable ones become NaN,
//! so the engine classifies them instead of the reader failing. Rows cut short
//! read their absent trailing cells as blank.

use crate::error::RatingError;
use crate::types::{MatchLog, MatchRecord, Period};
use anyhow::Context;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct MatchRow {
    season: String,
    week: String,
    entity_a: Option<String>,
    entity_b: Option<String>,
    score_a: Option<String>,
    score_b: Option<String>,
}

fn parse_score(cell: Option<&str>) -> Option<f64> {
    match cell.map(str::trim) {
        None | Some("") => None,
        Some(text) => Some(text.parse().unwrap_or(f64::NAN)),
    }
}

fn parse_period(row: &MatchRow, line: u64) -> crate::error::Result<Period> {
    let season = row.season.trim().parse().map_err(|_| {
        RatingError::input(format!("line {}: invalid season {:?}", line, row.season))
    })?;
    let week = row.week.trim().parse().map_err(|_| {
        RatingError::input(format!("line {}: invalid week {:?}", line, row.week))
    })?;
    Ok(Period::new(season, week))
}

/// Read a match log from any CSV source
pub fn read_match_log<R: Read>(source: R) -> crate::error::Result<MatchLog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let mut log = MatchLog::new();
    for (i, result) in reader.deserialize::<MatchRow>().enumerate() {
        // Line 1 is the header
        let line = i as u64 + 2;
        let row = result.map_err(|e| RatingError::input(format!("line {}: {}", line, e)))?;
        let period = parse_period(&row, line)?;

        log.push(MatchRecord {
            period,
            entity_a: row.entity_a.clone().unwrap_or_default(),
            entity_b: row.entity_b.clone().unwrap_or_default(),
            score_a: parse_score(row.score_a.as_deref()),
            score_b: parse_score(row.score_b.as_deref()),
        });
    }

    debug!("Read {} match rows", log.len());
    Ok(log)
}

/// Read a match log from a CSV file
pub fn read_match_log_file(path: &Path) -> crate::error::Result<MatchLog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open match log {}", path.display()))?;
    read_match_log(file).with_context(|| format!("Failed to read match log {}", path.display()))
}
