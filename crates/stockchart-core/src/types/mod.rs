//! Core data types for the stock chart plotter.

mod chart;
mod color;
mod indicator;
mod line;
mod ohlcv;
mod session;

pub use chart::{CandlePoint, LinePoint, LineSeries, PlotSummary};
pub use color::Color;
pub use indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorSpec};
pub use line::LineSpec;
pub use ohlcv::{FilteredSeries, OhlcvRecord};
pub use session::TradingDay;
