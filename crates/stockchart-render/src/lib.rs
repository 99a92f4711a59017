//! Chart rendering.
//!
//! [`ChartPlotter`] feeds a [`stockchart_core::ChartSurface`]; the
//! [`TerminalSurface`] draws candlesticks with ratatui.

pub mod plotter;
pub mod terminal;

pub use plotter::{chart_title, ChartPlotter};
pub use terminal::{ChartOptions, ChartView, TerminalSurface, Theme};
