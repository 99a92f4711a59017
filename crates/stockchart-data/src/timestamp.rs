//! Timestamp parsing and display helpers.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use stockchart_core::DataError;

/// Default pattern of the `Local time` column,
/// e.g. `01.07.2025 09:00:00.000 GMT+0200`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S%.3f GMT%z";

/// A strftime pattern for offset-carrying timestamps.
///
/// Parsing keeps the offset found in the text, and formatting through the
/// same pattern reproduces the original wall-clock fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pattern: String,
}

impl TimestampFormat {
    /// Create a format from a chrono strftime pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// The strftime pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse a timestamp, keeping its offset.
    pub fn parse(&self, text: &str) -> Result<DateTime<FixedOffset>, DataError> {
        DateTime::parse_from_str(text.trim(), &self.pattern).map_err(|_| DataError::Timestamp {
            text: text.to_string(),
            pattern: self.pattern.clone(),
        })
    }

    /// Format a timestamp back through the pattern.
    pub fn format(&self, timestamp: &DateTime<FixedOffset>) -> String {
        timestamp.format(&self.pattern).to_string()
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

/// Drop the offset, keeping the local wall-clock time.
#[inline]
pub fn strip_offset(timestamp: &DateTime<FixedOffset>) -> NaiveDateTime {
    timestamp.naive_local()
}

/// ISO-8601 without offset, e.g. `2025-07-01T09:00:00`.
pub fn iso_naive(timestamp: &DateTime<FixedOffset>) -> String {
    strip_offset(timestamp)
        .format("%Y-%m-%dT%H:%M:%S%.f")
        .to_string()
}

/// Format a date for display (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// A single date, or `start to end` when the dates differ.
pub fn date_range_string(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        format_date(start)
    } else {
        format!("{} to {}", format_date(start), format_date(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_keeps_offset() {
        let format = TimestampFormat::default();
        let ts = format.parse("01.07.2025 09:15:00.000 GMT+0200").unwrap();

        assert_eq!(ts.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.minute(), 15);
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn test_round_trip() {
        let format = TimestampFormat::default();
        for text in [
            "01.07.2025 00:00:00.000 GMT+0200",
            "31.12.2024 17:29:59.500 GMT+0100",
            "15.03.2025 23:45:00.000 GMT-0500",
        ] {
            let parsed = format.parse(text).unwrap();
            assert_eq!(format.format(&parsed), text);
        }
    }

    #[test]
    fn test_parse_rejects_mismatch() {
        let format = TimestampFormat::default();

        assert!(matches!(
            format.parse("2025-07-01 09:00:00"),
            Err(DataError::Timestamp { .. })
        ));
        assert!(format.parse("01.07.2025 09:00:00.000").is_err());
    }

    #[test]
    fn test_custom_pattern() {
        let format = TimestampFormat::new("%Y-%m-%d %H:%M:%S %z");
        let ts = format.parse("2025-07-01 09:00:00 +0000").unwrap();
        assert_eq!(iso_naive(&ts), "2025-07-01T09:00:00");
    }

    #[test]
    fn test_display_helpers() {
        let format = TimestampFormat::default();
        let ts = format.parse("01.07.2025 09:00:00.000 GMT+0200").unwrap();

        assert_eq!(iso_naive(&ts), "2025-07-01T09:00:00");
        assert_eq!(strip_offset(&ts).format("%H:%M").to_string(), "09:00");

        let a = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 7, 3).unwrap();
        assert_eq!(date_range_string(a, a), "2025-07-01");
        assert_eq!(date_range_string(a, b), "2025-07-01 to 2025-07-03");
    }
}
