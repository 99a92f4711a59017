//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single intraday price bar as read from the source file.
///
/// The timestamp keeps the offset it was recorded with, so the local
/// wall-clock time of the feed survives until it is stripped for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    /// Bar timestamp with its source offset
    pub timestamp: DateTime<FixedOffset>,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: u64,
}

impl OhlcvRecord {
    /// Create a new record.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calendar date in the record's own offset.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Local wall-clock time with the offset removed.
    #[inline]
    pub fn local_time(&self) -> NaiveDateTime {
        self.timestamp.naive_local()
    }

    /// The same instant expressed in UTC.
    #[inline]
    pub fn utc(&self) -> DateTime<Utc> {
        self.timestamp.with_timezone(&Utc)
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Records restricted to one or more trading-day windows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSeries {
    /// Records in chronological order
    pub records: Vec<OhlcvRecord>,
    /// Dates the series was built from, ascending
    pub days: Vec<NaiveDate>,
    /// False when at least one day was kept unfiltered (no session that day)
    pub filtered_to_trading_hours: bool,
}

impl FilteredSeries {
    /// Create a series, sorting the records chronologically.
    pub fn new(mut records: Vec<OhlcvRecord>, days: Vec<NaiveDate>, filtered: bool) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self {
            records,
            days,
            filtered_to_trading_hours: filtered,
        }
    }

    /// Get the number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record.
    pub fn first(&self) -> Option<&OhlcvRecord> {
        self.records.first()
    }

    /// Last record.
    pub fn last(&self) -> Option<&OhlcvRecord> {
        self.records.last()
    }

    /// Latest date the series was built from.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// Get an iterator over the records.
    pub fn iter(&self) -> impl Iterator<Item = &OhlcvRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(hour: u32, close: f64) -> OhlcvRecord {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2025, 7, 1, hour, 0, 0).unwrap();
        OhlcvRecord::new(ts, 100.0, 110.0, 95.0, close, 1000)
    }

    #[test]
    fn test_record_local_views() {
        let r = record(23, 105.0);

        assert_eq!(r.date(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(r.local_time().format("%H:%M").to_string(), "23:00");
        assert_eq!(r.utc().format("%Y-%m-%d %H:%M").to_string(), "2025-07-01 21:00");
        assert!(r.is_bullish());
        assert!((r.range() - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_series_sorts_records() {
        let series = FilteredSeries::new(
            vec![record(12, 2.0), record(10, 1.0)],
            vec![NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()],
            true,
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.0, 2.0]);
        assert_eq!(series.first().unwrap().close, 1.0);
        assert_eq!(
            series.latest_date(),
            Some(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
        );
    }
}
