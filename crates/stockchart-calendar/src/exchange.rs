//! Exchange table and the concrete [`TradingHoursProvider`].

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use stockchart_core::{CalendarError, TradingDay, TradingHoursProvider};
use tracing::debug;

use crate::holidays::{is_weekend, HolidayRules};

/// Static description of one exchange.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeSpec {
    /// ISO 10383 market identifier code
    pub code: &'static str,
    pub aliases: &'static [&'static str],
    pub name: &'static str,
    pub timezone: Tz,
    /// Regular open as (hour, minute), local time
    pub open: (u32, u32),
    /// Regular close as (hour, minute), local time
    pub close: (u32, u32),
    pub rules: HolidayRules,
}

impl ExchangeSpec {
    /// Check whether `code` names this exchange, ignoring case.
    pub fn matches(&self, code: &str) -> bool {
        let code = code.trim();
        self.code.eq_ignore_ascii_case(code)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(code))
    }

    fn local_time(&self, (hour, minute): (u32, u32), date: NaiveDate) -> Result<NaiveTime, CalendarError> {
        NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| CalendarError::InvalidLocalTime {
            exchange: self.code.to_string(),
            date,
            time: format!("{:02}:{:02}", hour, minute),
        })
    }

    fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> Result<chrono::DateTime<Utc>, CalendarError> {
        self.timezone
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| CalendarError::InvalidLocalTime {
                exchange: self.code.to_string(),
                date,
                time: time.format("%H:%M").to_string(),
            })
    }

    /// Session for `date`, with early closes applied.
    pub fn session(&self, date: NaiveDate) -> Result<TradingDay, CalendarError> {
        if is_weekend(date) || self.rules.is_holiday(date) {
            return Err(CalendarError::NoSession {
                exchange: self.code.to_string(),
                date,
            });
        }

        let open_time = self.local_time(self.open, date)?;
        let close_time = match self.rules.early_close(date) {
            Some(early) => {
                debug!("{} closes early at {} on {}", self.code, early, date);
                early
            }
            None => self.local_time(self.close, date)?,
        };

        Ok(TradingDay::new(
            date,
            self.to_utc(date, open_time)?,
            self.to_utc(date, close_time)?,
        ))
    }
}

/// Supported exchanges.
pub static EXCHANGES: [ExchangeSpec; 5] = [
    ExchangeSpec {
        code: "XETR",
        aliases: &["XETRA"],
        name: "Deutsche Boerse Xetra",
        timezone: chrono_tz::Europe::Berlin,
        open: (9, 0),
        close: (17, 30),
        rules: HolidayRules::Xetra,
    },
    ExchangeSpec {
        code: "XNYS",
        aliases: &["NYSE"],
        name: "New York Stock Exchange",
        timezone: chrono_tz::America::New_York,
        open: (9, 30),
        close: (16, 0),
        rules: HolidayRules::UnitedStates,
    },
    ExchangeSpec {
        code: "XNAS",
        aliases: &["NASDAQ"],
        name: "NASDAQ",
        timezone: chrono_tz::America::New_York,
        open: (9, 30),
        close: (16, 0),
        rules: HolidayRules::UnitedStates,
    },
    ExchangeSpec {
        code: "XLON",
        aliases: &["LSE"],
        name: "London Stock Exchange",
        timezone: chrono_tz::Europe::London,
        open: (8, 0),
        close: (16, 30),
        rules: HolidayRules::London,
    },
    ExchangeSpec {
        code: "XPAR",
        aliases: &["EURONEXT"],
        name: "Euronext Paris",
        timezone: chrono_tz::Europe::Paris,
        open: (9, 0),
        close: (17, 30),
        rules: HolidayRules::Euronext,
    },
];

/// Exchange calendars backed by the built-in table.
#[derive(Debug, Clone, Default)]
pub struct ExchangeCalendars {
    history_start: Option<NaiveDate>,
}

impl ExchangeCalendars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the first date with sessions.
    pub fn with_history_start(mut self, start: NaiveDate) -> Self {
        self.history_start = Some(start);
        self
    }

    /// Look up an exchange by code or alias.
    pub fn resolve(&self, code: &str) -> Result<&'static ExchangeSpec, CalendarError> {
        EXCHANGES
            .iter()
            .find(|spec| spec.matches(code))
            .ok_or_else(|| CalendarError::UnknownExchange(code.to_string()))
    }

    /// All exchanges in the table.
    pub fn exchanges(&self) -> &'static [ExchangeSpec] {
        &EXCHANGES
    }
}

impl TradingHoursProvider for ExchangeCalendars {
    fn trading_hours(&self, exchange_code: &str, date: NaiveDate) -> Result<TradingDay, CalendarError> {
        let spec = self.resolve(exchange_code)?;
        let day = spec.session(date)?;
        debug!(
            "{} session on {}: {} - {} UTC",
            spec.code, date, day.open, day.close
        );
        Ok(day)
    }

    fn history_start(&self, exchange_code: &str) -> Result<NaiveDate, CalendarError> {
        self.resolve(exchange_code)?;
        Ok(self
            .history_start
            .or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1))
            .unwrap_or(NaiveDate::MIN))
    }

    fn supported_exchanges(&self) -> Vec<String> {
        EXCHANGES.iter().map(|spec| spec.code.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_xetra_summer_session() {
        let day = ExchangeCalendars::new()
            .trading_hours("XETR", date(2025, 7, 1))
            .unwrap();

        assert_eq!(day.open, utc(2025, 7, 1, 7, 0));
        assert_eq!(day.close, utc(2025, 7, 1, 15, 30));
    }

    #[test]
    fn test_xetra_winter_session() {
        let day = ExchangeCalendars::new()
            .trading_hours("xetra", date(2025, 1, 15))
            .unwrap();

        assert_eq!(day.open, utc(2025, 1, 15, 8, 0));
        assert_eq!(day.close, utc(2025, 1, 15, 16, 30));
    }

    #[test]
    fn test_us_dst_gap_between_regions() {
        // US has switched to daylight time, Europe has not
        let day = ExchangeCalendars::new()
            .trading_hours("NYSE", date(2025, 3, 10))
            .unwrap();

        assert_eq!(day.open, utc(2025, 3, 10, 13, 30));
        assert_eq!(day.close, utc(2025, 3, 10, 20, 0));
    }

    #[test]
    fn test_early_close() {
        let calendars = ExchangeCalendars::new();

        let nyse = calendars.trading_hours("XNYS", date(2025, 11, 28)).unwrap();
        assert_eq!(nyse.close, utc(2025, 11, 28, 18, 0));

        let lse = calendars.trading_hours("XLON", date(2025, 12, 24)).unwrap();
        assert_eq!(lse.close, utc(2025, 12, 24, 12, 30));
    }

    #[test]
    fn test_no_session_on_weekend_and_holiday() {
        let calendars = ExchangeCalendars::new();

        assert!(matches!(
            calendars.trading_hours("XETR", date(2025, 7, 5)),
            Err(CalendarError::NoSession { .. })
        ));
        assert!(matches!(
            calendars.trading_hours("XETR", date(2025, 12, 25)),
            Err(CalendarError::NoSession { .. })
        ));
        assert!(!calendars.is_trading_day("XNAS", date(2025, 7, 4)).unwrap());
    }

    #[test]
    fn test_unknown_exchange() {
        let calendars = ExchangeCalendars::new();
        let err = calendars.trading_hours("XXXX", date(2025, 7, 1)).unwrap_err();

        assert_eq!(err, CalendarError::UnknownExchange("XXXX".to_string()));
        assert!(calendars.history_start("XXXX").is_err());
    }

    #[test]
    fn test_latest_trading_days_skips_holidays() {
        // 2025-04-18 Good Friday, 2025-04-21 Easter Monday
        let days = ExchangeCalendars::new()
            .latest_trading_days("XETR", date(2025, 4, 22), 3)
            .unwrap();

        assert_eq!(days, vec![date(2025, 4, 16), date(2025, 4, 17), date(2025, 4, 22)]);
    }

    #[test]
    fn test_history_start_limits_walk() {
        let calendars = ExchangeCalendars::new().with_history_start(date(2025, 6, 30));
        let days = calendars
            .latest_trading_days("XETR", date(2025, 7, 2), 10)
            .unwrap();

        assert_eq!(days, vec![date(2025, 6, 30), date(2025, 7, 1), date(2025, 7, 2)]);
    }

    #[test]
    fn test_supported_exchanges() {
        let codes = ExchangeCalendars::new().supported_exchanges();
        assert_eq!(codes, vec!["XETR", "XNYS", "XNAS", "XLON", "XPAR"]);
    }
}
