//! CSV data source for OHLCV records.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use stockchart_core::{DataError, OhlcvRecord};
use tracing::{debug, info};

use crate::timestamp::TimestampFormat;

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Local time", "Open", "High", "Low", "Close", "Volume"];

/// CSV row format.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Local time")]
    local_time: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

/// Reads OHLCV files and selects days from the loaded records.
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    format: TimestampFormat,
}

impl CsvReader {
    /// Create a reader that parses timestamps with `format`.
    pub fn new(format: TimestampFormat) -> Self {
        Self { format }
    }

    /// Timestamp format used for the `Local time` column.
    pub fn format(&self) -> &TimestampFormat {
        &self.format
    }

    /// Load all records from a CSV file, sorted by timestamp.
    ///
    /// Any unparseable row aborts the whole load.
    pub fn load(&self, path: &Path) -> Result<Vec<OhlcvRecord>, DataError> {
        if !path.is_file() {
            return Err(DataError::file(path, "file not found"));
        }

        info!("Loading CSV file: {}", path.display());

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| DataError::file(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::file(path, e))?
            .clone();
        check_columns(&headers)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result.map_err(|e| DataError::Parse {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                reason: e.to_string(),
            })?;
            records.push(self.parse_row(&row, &headers)?);
        }

        records.sort_by_key(|r| r.timestamp);

        info!("Successfully loaded {} data points", records.len());
        Ok(records)
    }

    fn parse_row(&self, row: &StringRecord, headers: &StringRecord) -> Result<OhlcvRecord, DataError> {
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let parsed: CsvRow = row.deserialize(Some(headers)).map_err(|e| DataError::Parse {
            line,
            reason: e.to_string(),
        })?;

        let timestamp = self.format.parse(&parsed.local_time).map_err(|e| DataError::Parse {
            line,
            reason: e.to_string(),
        })?;

        let prices = [
            ("Open", parsed.open),
            ("High", parsed.high),
            ("Low", parsed.low),
            ("Close", parsed.close),
        ];
        if let Some((column, value)) = prices.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DataError::Parse {
                line,
                reason: format!("{} must be a finite number, got {}", column, value),
            });
        }

        if !parsed.volume.is_finite() || parsed.volume < 0.0 {
            return Err(DataError::Parse {
                line,
                reason: format!("volume must be a non-negative number, got {}", parsed.volume),
            });
        }

        Ok(OhlcvRecord::new(
            timestamp,
            parsed.open,
            parsed.high,
            parsed.low,
            parsed.close,
            parsed.volume.round() as u64,
        ))
    }

    /// Records of the latest date present.
    pub fn latest_day(&self, records: &[OhlcvRecord]) -> Vec<OhlcvRecord> {
        latest_day(records)
    }

    /// Records of the `n` latest distinct dates present, keyed by date.
    pub fn latest_days(&self, records: &[OhlcvRecord], n: usize) -> BTreeMap<NaiveDate, Vec<OhlcvRecord>> {
        latest_days(records, n)
    }
}

fn check_columns(headers: &StringRecord) -> Result<(), DataError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::Format { missing })
    }
}

/// Latest local date present in the records.
pub fn latest_date(records: &[OhlcvRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date()).max()
}

/// Records whose local date equals the latest date present.
pub fn latest_day(records: &[OhlcvRecord]) -> Vec<OhlcvRecord> {
    let Some(latest) = latest_date(records) else {
        return Vec::new();
    };

    let day: Vec<OhlcvRecord> = records.iter().filter(|r| r.date() == latest).copied().collect();
    info!("Extracted {} data points for latest trading day: {}", day.len(), latest);
    day
}

/// Group the `n` latest distinct dates present, ascending by date.
///
/// Dates come from the data, not from any calendar. Asking for more dates
/// than exist returns all of them.
pub fn latest_days(records: &[OhlcvRecord], n: usize) -> BTreeMap<NaiveDate, Vec<OhlcvRecord>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<OhlcvRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date()).or_default().push(*record);
    }

    let excess = by_date.len().saturating_sub(n);
    let selected: BTreeMap<NaiveDate, Vec<OhlcvRecord>> = by_date.into_iter().skip(excess).collect();

    for (date, day) in &selected {
        debug!("Found {} data points for {}", day.len(), date);
    }
    selected
}
