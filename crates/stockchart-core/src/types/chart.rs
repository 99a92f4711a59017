//! Point schema consumed by chart surfaces.
//!
//! All times are naive local wall-clock times. Surfaces never see offsets,
//! so a bar recorded at 09:00 GMT+0200 is drawn at 09:00.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::Color;

/// A candlestick point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandlePoint {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A point of an overlay line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub time: NaiveDateTime,
    pub value: f64,
}

/// A named overlay line (e.g. an indicator).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: Color,
    pub width: u32,
    pub points: Vec<LinePoint>,
}

/// What a plot call handed to the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotSummary {
    pub candles: usize,
    pub indicator_points: usize,
    pub dropped_indicator_points: usize,
    pub lines: usize,
}
