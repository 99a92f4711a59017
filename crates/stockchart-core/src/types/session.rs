//! Trading session window.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Official open/close instants of one exchange session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingDay {
    /// Session date in the exchange's local calendar
    pub date: NaiveDate,
    /// Market open
    pub open: DateTime<Utc>,
    /// Market close
    pub close: DateTime<Utc>,
}

impl TradingDay {
    pub fn new(date: NaiveDate, open: DateTime<Utc>, close: DateTime<Utc>) -> Self {
        Self { date, open, close }
    }

    /// Whether `instant` lies inside the session, both ends included.
    #[inline]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.open <= instant && instant <= self.close
    }

    /// Session length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.close - self.open).num_minutes()
    }
}
