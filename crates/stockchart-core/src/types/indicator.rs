//! Indicator descriptors and computed series.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Color;

/// Supported indicator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// Exponential moving average of the close price
    Ema,
}

impl IndicatorKind {
    /// Lower-case identifier used in specs and exported names.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Ema => "ema",
        }
    }

    /// Look up a kind by its identifier, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ema" => Some(IndicatorKind::Ema),
            _ => None,
        }
    }

    /// All supported identifiers.
    pub fn supported() -> &'static [&'static str] {
        &["ema"]
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested indicator, e.g. `ema_50|red`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    pub period: usize,
    pub color: Color,
}

impl IndicatorSpec {
    pub fn new(kind: IndicatorKind, period: usize, color: Color) -> Self {
        Self {
            kind,
            period,
            color,
        }
    }

    /// Display and export name, e.g. `ema_50`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.kind, self.period)
    }
}

/// One computed indicator value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
}

/// Indicator values aligned to record timestamps.
///
/// Warm-up positions produce no point, so the first point corresponds to
/// record `period - 1` of the series it was computed on.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub spec: IndicatorSpec,
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn new(spec: IndicatorSpec, points: Vec<IndicatorPoint>) -> Self {
        Self { spec, points }
    }

    pub fn name(&self) -> String {
        self.spec.name()
    }

    /// Value at an exact timestamp, if one was computed.
    pub fn value_at(&self, timestamp: &DateTime<FixedOffset>) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.timestamp.cmp(timestamp))
            .ok()
            .map(|i| self.points[i].value)
    }
}
