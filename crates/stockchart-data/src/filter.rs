//! Trading-hours filtering.

use chrono::{DateTime, Utc};
use stockchart_core::{OhlcvRecord, TradingDay};
use tracing::{debug, info};

/// Keep records with `open <= timestamp <= close`, preserving order.
///
/// Both ends are included so a bar stamped exactly at the close survives.
/// An empty result is not an error.
pub fn filter_range(
    records: Vec<OhlcvRecord>,
    open: DateTime<Utc>,
    close: DateTime<Utc>,
) -> Vec<OhlcvRecord> {
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        debug!(
            "Filtering {} to {} against session {} - {}",
            first.timestamp, last.timestamp, open, close
        );
    }

    let before = records.len();
    let filtered: Vec<OhlcvRecord> = records
        .into_iter()
        .filter(|r| {
            let t = r.utc();
            open <= t && t <= close
        })
        .collect();

    info!(
        "Filtered {} to {} data points between {} and {}",
        before,
        filtered.len(),
        open,
        close
    );
    filtered
}

/// Filter one day's records to its session window.
pub fn filter_session(records: Vec<OhlcvRecord>, session: &TradingDay) -> Vec<OhlcvRecord> {
    filter_range(records, session.open, session.close)
}
