//! Chart surface trait definitions.

use crate::error::RenderError;
use crate::types::{CandlePoint, LineSeries, LineSpec};

/// A drawable chart.
///
/// The plotter pushes data through these calls in order: candles, overlay
/// series, horizontal lines, fit. `show` hands control to the surface until
/// the user closes it.
pub trait ChartSurface {
    /// Replace the candlestick data.
    fn set_candles(&mut self, candles: &[CandlePoint]) -> Result<(), RenderError>;

    /// Add an overlay line series.
    fn add_line_series(&mut self, series: &LineSeries) -> Result<(), RenderError>;

    /// Add a labelled horizontal price line.
    fn add_horizontal_line(&mut self, line: &LineSpec) -> Result<(), RenderError>;

    /// Fit the visible range to the data.
    fn fit_content(&mut self) -> Result<(), RenderError>;

    /// Display the chart, blocking until it is closed.
    fn show(&mut self) -> Result<(), RenderError>;
}
