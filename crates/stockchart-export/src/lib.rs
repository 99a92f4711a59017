//! JSON export of filtered OHLCV series.
//!
//! The envelope carries export metadata, the data points with offsets
//! stripped, and optionally the indicator values aligned to those points.

use chrono::{Local, NaiveDateTime};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use stockchart_core::{DataError, FilteredSeries, IndicatorSeries, LineSpec, OhlcvRecord};
use stockchart_data::{format_date, iso_naive};
use stockchart_indicators::IndicatorMetadata;
use tracing::{info, warn};

const DATA_FORMAT: &str = "OHLCV";
const TIMEZONE_INFO: &str = "Local time (timezone information removed for cleaner output)";

/// Invocation details recorded in the export metadata.
#[derive(Debug, Clone, Default)]
pub struct ExportContext {
    pub exchange_code: String,
    pub days_requested: usize,
    pub input_file: PathBuf,
    /// Indicator series already aligned to the exported records
    pub indicators: Vec<IndicatorSeries>,
    pub lines: Vec<LineSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub export_timestamp: String,
    pub exchange_code: String,
    pub days_requested: usize,
    pub data_points_count: usize,
    pub time_range: TimeRange,
    pub data_format: &'static str,
    pub timezone_info: &'static str,
    pub input_file: String,
    pub latest_date: Option<String>,
    pub filtered_to_trading_hours: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<IndicatorMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineLevels>,
}

/// `label -> value` pairs kept in the order the lines were given.
///
/// A repeated label keeps its first position and takes the later value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineLevels(Vec<(String, f64)>);

impl LineLevels {
    pub fn from_specs(lines: &[LineSpec]) -> Self {
        let mut levels: Vec<(String, f64)> = Vec::with_capacity(lines.len());
        for line in lines {
            match levels.iter_mut().find(|(label, _)| *label == line.label) {
                Some(entry) => entry.1 = line.value,
                None => levels.push((line.label.clone(), line.value)),
            }
        }
        Self(levels)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, value)| (label.as_str(), *value))
    }
}

impl Serialize for LineLevels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// One exported bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&OhlcvRecord> for DataPoint {
    fn from(record: &OhlcvRecord) -> Self {
        Self {
            timestamp: iso_naive(&record.timestamp),
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        }
    }
}

/// Top-level JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct ExportEnvelope {
    pub metadata: ExportMetadata,
    pub data: Vec<DataPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<Map<String, Value>>>,
}

impl ExportEnvelope {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Writes export envelopes to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    /// Build the envelope with the current local time as export timestamp.
    pub fn envelope(&self, series: &FilteredSeries, context: &ExportContext) -> ExportEnvelope {
        build_envelope(series, context, Local::now().naive_local())
    }

    /// Write `series` to `path`, creating parent directories and
    /// overwriting any existing file.
    pub fn export(
        &self,
        series: &FilteredSeries,
        context: &ExportContext,
        path: &Path,
    ) -> Result<ExportEnvelope, DataError> {
        if series.is_empty() {
            warn!("Exporting an empty series to {}", path.display());
        }

        let envelope = self.envelope(series, context);
        let json = envelope.to_json().map_err(|e| DataError::file(path, e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DataError::file(parent, e))?;
        }
        fs::write(path, json).map_err(|e| DataError::file(path, e))?;

        info!(
            "Successfully exported {} data points to {}",
            series.len(),
            path.display()
        );
        Ok(envelope)
    }
}

/// Assemble the envelope for a given export time.
pub fn build_envelope(
    series: &FilteredSeries,
    context: &ExportContext,
    exported_at: NaiveDateTime,
) -> ExportEnvelope {
    let data: Vec<DataPoint> = series.iter().map(DataPoint::from).collect();

    let indicators_requested = !context.indicators.is_empty();
    let metadata = ExportMetadata {
        export_timestamp: exported_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        exchange_code: context.exchange_code.clone(),
        days_requested: context.days_requested,
        data_points_count: series.len(),
        time_range: TimeRange {
            start: series.first().map(|r| iso_naive(&r.timestamp)),
            end: series.last().map(|r| iso_naive(&r.timestamp)),
        },
        data_format: DATA_FORMAT,
        timezone_info: TIMEZONE_INFO,
        input_file: context.input_file.display().to_string(),
        latest_date: series.latest_date().map(format_date),
        filtered_to_trading_hours: series.filtered_to_trading_hours,
        indicators: indicators_requested.then(|| {
            context
                .indicators
                .iter()
                .map(|s| IndicatorMetadata::from(&s.spec))
                .collect()
        }),
        lines: (!context.lines.is_empty()).then(|| LineLevels::from_specs(&context.lines)),
    };

    let indicators = indicators_requested.then(|| aligned_values(series, &context.indicators));

    ExportEnvelope {
        metadata,
        data,
        indicators,
    }
}

/// One object per record with every indicator's value, or null during warm-up.
fn aligned_values(series: &FilteredSeries, indicators: &[IndicatorSeries]) -> Vec<Map<String, Value>> {
    series
        .iter()
        .map(|record| {
            indicators
                .iter()
                .map(|indicator| {
                    let value = indicator
                        .value_at(&record.timestamp)
                        .map(Value::from)
                        .unwrap_or(Value::Null);
                    (indicator.name(), value)
                })
                .collect()
        })
        .collect()
}

/// Check an output path before any data is loaded.
///
/// Fails when the path exists but is not a regular file, or is read-only.
/// A missing `.json` extension only warns.
pub fn validate_output_path(path: &Path) -> Result<(), DataError> {
    if path.exists() {
        if !path.is_file() {
            return Err(DataError::file(path, "output path exists but is not a file"));
        }
        let metadata = fs::metadata(path).map_err(|e| DataError::file(path, e))?;
        if metadata.permissions().readonly() {
            return Err(DataError::file(path, "output file is not writable"));
        }
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        warn!("Output file does not have .json extension: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
    use stockchart_core::{Color, IndicatorKind, IndicatorPoint, IndicatorSpec};
    use tempfile::TempDir;

    fn ts(i: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 7, 1, 9, 0, 0)
            .unwrap()
            + chrono::Duration::minutes(15 * i as i64)
    }

    fn series(n: u32) -> FilteredSeries {
        let records = (0..n)
            .map(|i| OhlcvRecord::new(ts(i), 28.9, 29.2, 28.8, 29.1, 1500))
            .collect();
        FilteredSeries::new(records, vec![NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()], true)
    }

    fn context() -> ExportContext {
        ExportContext {
            exchange_code: "XETR".to_string(),
            days_requested: 1,
            input_file: PathBuf::from("data/sap.csv"),
            ..ExportContext::default()
        }
    }

    fn exported_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 2)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_ten_records() {
        let envelope = build_envelope(&series(10), &context(), exported_at());
        let json: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        assert_eq!(json["data"].as_array().unwrap().len(), 10);
        assert_eq!(json["metadata"]["data_points_count"], 10);
        assert_eq!(json["metadata"]["time_range"]["start"], "2025-07-01T09:00:00");
        assert_eq!(json["metadata"]["time_range"]["end"], "2025-07-01T11:15:00");
        assert_eq!(json["data"][0]["timestamp"], "2025-07-01T09:00:00");
        assert_eq!(json["metadata"]["export_timestamp"], "2025-07-02T08:30:00");
        assert_eq!(json["metadata"]["latest_date"], "2025-07-01");
        assert_eq!(json["metadata"]["data_format"], "OHLCV");
        assert_eq!(json["metadata"]["input_file"], "data/sap.csv");
        assert_eq!(json["metadata"]["filtered_to_trading_hours"], true);
        assert!(json["metadata"].get("indicators").is_none());
        assert!(json["metadata"].get("lines").is_none());
        assert!(json.get("indicators").is_none());
    }

    #[test]
    fn test_empty_series() {
        let envelope = build_envelope(&FilteredSeries::default(), &context(), exported_at());
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["metadata"]["data_points_count"], 0);
        assert!(json["metadata"]["time_range"]["start"].is_null());
        assert!(json["metadata"]["latest_date"].is_null());
    }

    #[test]
    fn test_indicators_and_lines() {
        let spec = IndicatorSpec::new(IndicatorKind::Ema, 2, Color::parse("red").unwrap());
        let indicator = IndicatorSeries::new(
            spec,
            vec![
                IndicatorPoint { timestamp: ts(1), value: 29.05 },
                IndicatorPoint { timestamp: ts(2), value: 29.1 },
            ],
        );
        let context = ExportContext {
            indicators: vec![indicator],
            lines: vec![LineSpec::new("Support", 28.7, Color::parse("blue").unwrap(), 1)],
            ..context()
        };

        let json = serde_json::to_value(build_envelope(&series(3), &context, exported_at())).unwrap();

        assert_eq!(json["metadata"]["indicators"][0]["name"], "ema_2");
        assert_eq!(json["metadata"]["indicators"][0]["type"], "ema");
        assert_eq!(json["metadata"]["lines"]["Support"], 28.7);

        let values = json["indicators"].as_array().unwrap();
        assert_eq!(values.len(), 3);
        assert!(values[0]["ema_2"].is_null());
        assert_eq!(values[1]["ema_2"], 29.05);
    }

    #[test]
    fn test_lines_keep_given_order() {
        let blue = Color::parse("blue").unwrap();
        let context = ExportContext {
            lines: vec![
                LineSpec::new("Support", 28.7, blue.clone(), 1),
                LineSpec::new("Resistance", 30.2, blue.clone(), 1),
                LineSpec::new("Pivot", 29.4, blue.clone(), 1),
                LineSpec::new("Support", 28.5, blue, 1),
            ],
            ..context()
        };

        let text = build_envelope(&series(1), &context, exported_at())
            .to_json()
            .unwrap();
        let support = text.find("\"Support\"").unwrap();
        let resistance = text.find("\"Resistance\"").unwrap();
        let pivot = text.find("\"Pivot\"").unwrap();
        assert!(support < resistance && resistance < pivot);
        assert_eq!(text.matches("\"Support\"").count(), 1);

        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["metadata"]["lines"]["Support"], 28.5);
    }

    #[test]
    fn test_export_creates_dirs_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/chart.json");
        let exporter = JsonExporter::new();

        exporter.export(&series(5), &context(), &path).unwrap();
        exporter.export(&series(2), &context(), &path).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["metadata"]["data_points_count"], 2);
    }

    #[test]
    fn test_validate_output_path() {
        let dir = TempDir::new().unwrap();

        assert!(validate_output_path(&dir.path().join("new.json")).is_ok());
        assert!(validate_output_path(&dir.path().join("new.txt")).is_ok());
        assert!(matches!(
            validate_output_path(dir.path()),
            Err(DataError::File { .. })
        ));

        let readonly = dir.path().join("locked.json");
        fs::write(&readonly, "{}").unwrap();
        let mut perms = fs::metadata(&readonly).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&readonly, perms).unwrap();
        assert!(validate_output_path(&readonly).is_err());
    }
}
