//! Core types and traits for the stock chart plotter.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (OhlcvRecord, TradingDay, FilteredSeries)
//! - Chart overlay descriptors (Color, LineSpec, IndicatorSpec)
//! - Core traits for the trading calendar, indicators, and chart surfaces

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CalendarError, ChartError, ChartResult, ConfigError, DataError, RenderError};
pub use traits::*;
pub use types::*;
