//! Exchange trading calendars.
//!
//! A static table of exchanges with local session hours, holiday rules and
//! early closes. [`ExchangeCalendars`] implements
//! [`stockchart_core::TradingHoursProvider`] over that table.

pub mod exchange;
pub mod holidays;

pub use exchange::{ExchangeCalendars, ExchangeSpec, EXCHANGES};
pub use holidays::HolidayRules;
