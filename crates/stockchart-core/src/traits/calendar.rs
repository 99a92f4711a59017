//! Trading calendar trait definitions.

use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::types::TradingDay;

/// Source of exchange trading sessions.
///
/// Implementations answer per exchange code; the pipeline never depends on
/// a concrete calendar.
pub trait TradingHoursProvider {
    /// Get the official open/close instants for one session.
    ///
    /// # Errors
    /// * `UnknownExchange` - the code is not recognized
    /// * `NoSession` - the exchange is closed on `date`
    fn trading_hours(&self, exchange_code: &str, date: NaiveDate)
        -> Result<TradingDay, CalendarError>;

    /// Earliest date the calendar has sessions for.
    fn history_start(&self, exchange_code: &str) -> Result<NaiveDate, CalendarError>;

    /// Exchange codes this provider recognizes.
    fn supported_exchanges(&self) -> Vec<String>;

    /// Check if `date` is a trading session.
    fn is_trading_day(&self, exchange_code: &str, date: NaiveDate) -> Result<bool, CalendarError> {
        match self.trading_hours(exchange_code, date) {
            Ok(_) => Ok(true),
            Err(CalendarError::NoSession { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get the latest `n` sessions at or before `reference`, oldest first.
    ///
    /// Walks backward one day at a time. When the calendar's history ends
    /// before `n` sessions are found, the shorter list is returned.
    fn latest_trading_days(
        &self,
        exchange_code: &str,
        reference: NaiveDate,
        n: usize,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        let start = self.history_start(exchange_code)?;
        let mut days = Vec::new();
        let mut current = Some(reference);

        while let Some(date) = current {
            if days.len() >= n || date < start {
                break;
            }
            if self.is_trading_day(exchange_code, date)? {
                days.push(date);
            }
            current = date.pred_opt();
        }

        days.reverse();
        Ok(days)
    }
}
