//! Indicator series over OHLCV records.

use serde::Serialize;
use std::collections::HashSet;
use stockchart_core::traits::Indicator;
use stockchart_core::{
    ConfigError, IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorSpec, OhlcvRecord,
};
use tracing::{debug, info};

use crate::moving_average::Ema;

/// Export description of one requested indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorMetadata {
    #[serde(rename = "type")]
    pub kind: IndicatorKind,
    pub period: usize,
    pub color: String,
    pub name: String,
}

impl From<&IndicatorSpec> for IndicatorMetadata {
    fn from(spec: &IndicatorSpec) -> Self {
        Self {
            kind: spec.kind,
            period: spec.period,
            color: spec.color.to_string(),
            name: spec.name(),
        }
    }
}

/// Computes indicator series from close prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorCalculator;

impl IndicatorCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute every requested indicator over `records`.
    ///
    /// Callers pass the full loaded dataset so long periods warm up on
    /// history outside the displayed window. Fails if any period exceeds the
    /// number of records.
    pub fn calculate(
        &self,
        records: &[OhlcvRecord],
        specs: &[IndicatorSpec],
    ) -> Result<Vec<IndicatorSeries>, ConfigError> {
        if specs.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Calculating {} indicators for {} data points",
            specs.len(),
            records.len()
        );

        let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
        specs
            .iter()
            .map(|spec| -> Result<IndicatorSeries, ConfigError> {
                let indicator = match spec.kind {
                    IndicatorKind::Ema => Ema::new(spec.period)?,
                };
                indicator.validate_data(&closes)?;

                let values = indicator.calculate(&closes);
                let warmup = indicator.period() - 1;
                let points: Vec<IndicatorPoint> = records[warmup..]
                    .iter()
                    .zip(values)
                    .map(|(record, value)| IndicatorPoint {
                        timestamp: record.timestamp,
                        value,
                    })
                    .collect();

                info!(
                    "Calculated {}: {}/{} valid values",
                    spec.name(),
                    points.len(),
                    records.len()
                );
                Ok(IndicatorSeries::new(spec.clone(), points))
            })
            .collect()
    }

    /// Metadata entries for the export envelope.
    pub fn metadata(&self, specs: &[IndicatorSpec]) -> Vec<IndicatorMetadata> {
        specs.iter().map(IndicatorMetadata::from).collect()
    }
}

/// Keep only points whose timestamp appears in `records`.
pub fn align_to(series: &IndicatorSeries, records: &[OhlcvRecord]) -> IndicatorSeries {
    let timestamps: HashSet<_> = records.iter().map(|r| r.timestamp).collect();
    let points: Vec<IndicatorPoint> = series
        .points
        .iter()
        .filter(|p| timestamps.contains(&p.timestamp))
        .copied()
        .collect();

    debug!(
        "Aligned {} to {} of {} points",
        series.name(),
        points.len(),
        series.points.len()
    );
    IndicatorSeries::new(series.spec.clone(), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use stockchart_core::Color;

    fn records(closes: &[f64]) -> Vec<OhlcvRecord> {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let ts = offset
                    .with_ymd_and_hms(2025, 7, 1, 9, 0, 0)
                    .unwrap()
                    + chrono::Duration::minutes(15 * i as i64);
                OhlcvRecord::new(ts, close, close + 1.0, close - 1.0, close, 100)
            })
            .collect()
    }

    fn ema(period: usize) -> IndicatorSpec {
        IndicatorSpec::new(IndicatorKind::Ema, period, Color::parse("red").unwrap())
    }

    #[test]
    fn test_points_start_after_warmup() {
        let data = records(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let series = IndicatorCalculator::new().calculate(&data, &[ema(3)]).unwrap();

        assert_eq!(series.len(), 1);
        let points = &series[0].points;
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].timestamp, data[2].timestamp);
        assert!((points[0].value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_exceeding_data_fails() {
        let data = records(&[1.0, 2.0]);
        let result = IndicatorCalculator::new().calculate(&data, &[ema(2), ema(3)]);

        assert_eq!(
            result,
            Err(ConfigError::InsufficientData {
                required: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_no_specs() {
        assert!(IndicatorCalculator::new().calculate(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_align_to_window() {
        let data = records(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let full = IndicatorCalculator::new().calculate(&data, &[ema(2)]).unwrap();
        let aligned = align_to(&full[0], &data[3..]);

        assert_eq!(aligned.points.len(), 3);
        assert_eq!(aligned.points[0].timestamp, data[3].timestamp);
        assert_eq!(aligned.points[0].value, full[0].value_at(&data[3].timestamp).unwrap());
    }

    #[test]
    fn test_metadata() {
        let meta = IndicatorCalculator::new().metadata(&[ema(50)]);
        let json = serde_json::to_value(&meta[0]).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "ema", "period": 50, "color": "#FF0000", "name": "ema_50"})
        );
    }
}
