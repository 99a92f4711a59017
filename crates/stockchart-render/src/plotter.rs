//! Pushes a filtered series and its overlays onto a chart surface.

use chrono::{DateTime, FixedOffset};
use std::collections::HashSet;
use stockchart_core::{
    CandlePoint, ChartSurface, FilteredSeries, IndicatorSeries, LinePoint, LineSeries, LineSpec,
    PlotSummary, RenderError,
};
use stockchart_data::{date_range_string, strip_offset};
use tracing::{debug, info};

/// Chart title, e.g. `Stock Price Chart - XETR (2025-07-01)`.
pub fn chart_title(exchange: &str, series: &FilteredSeries) -> String {
    let range = match (series.days.first(), series.days.last()) {
        (Some(&start), Some(&end)) => date_range_string(start, end),
        _ => "no data".to_string(),
    };
    format!("Stock Price Chart - {} ({})", exchange.to_uppercase(), range)
}

/// Drives a [`ChartSurface`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn new() -> Self {
        Self
    }

    /// Send candles, indicator series and horizontal lines, then fit.
    ///
    /// Indicator points whose timestamp is not a candle are dropped and
    /// counted in the summary. Showing the chart is left to the caller.
    pub fn plot(
        &self,
        surface: &mut dyn ChartSurface,
        series: &FilteredSeries,
        indicators: &[IndicatorSeries],
        lines: &[LineSpec],
    ) -> Result<PlotSummary, RenderError> {
        let candles = candle_points(series);
        if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
            debug!("Plotting candles from {} to {}", first.time, last.time);
        }
        surface.set_candles(&candles)?;

        let mut summary = PlotSummary {
            candles: candles.len(),
            ..PlotSummary::default()
        };

        let instants: HashSet<DateTime<FixedOffset>> = series.iter().map(|r| r.timestamp).collect();
        for indicator in indicators {
            let (line_series, dropped) = indicator_line(indicator, &instants);
            summary.indicator_points += line_series.points.len();
            summary.dropped_indicator_points += dropped;
            surface.add_line_series(&line_series)?;
        }

        for line in lines {
            surface.add_horizontal_line(line)?;
        }
        summary.lines = lines.len();

        surface.fit_content()?;

        info!(
            "Plotted {} candles, {} indicator points ({} outside the window), {} lines",
            summary.candles, summary.indicator_points, summary.dropped_indicator_points, summary.lines
        );
        Ok(summary)
    }
}

/// Candles in local wall-clock time.
pub fn candle_points(series: &FilteredSeries) -> Vec<CandlePoint> {
    series
        .iter()
        .map(|r| CandlePoint {
            time: strip_offset(&r.timestamp),
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
        })
        .collect()
}

/// Indicator points restricted to candle instants, plus the dropped count.
fn indicator_line(
    indicator: &IndicatorSeries,
    instants: &HashSet<DateTime<FixedOffset>>,
) -> (LineSeries, usize) {
    let points: Vec<LinePoint> = indicator
        .points
        .iter()
        .filter(|p| instants.contains(&p.timestamp))
        .map(|p| LinePoint {
            time: strip_offset(&p.timestamp),
            value: p.value,
        })
        .collect();
    let dropped = indicator.points.len() - points.len();

    let line = LineSeries {
        name: indicator.name(),
        color: indicator.spec.color.clone(),
        width: 2,
        points,
    };
    (line, dropped)
}
