//! Parser for the `--indicators` argument.

use stockchart_core::{Color, ConfigError, IndicatorKind, IndicatorSpec};
use tracing::info;

/// Largest accepted indicator period.
pub const MAX_PERIOD: usize = 1000;

/// Parses `name_period|color` entries separated by commas,
/// e.g. `ema_50|red,ema_200|#00FF00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorParser;

impl IndicatorParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a full specification.
    ///
    /// A blank specification yields no indicators. Blank entries between
    /// commas are skipped, but a specification made only of separators is
    /// rejected.
    pub fn parse(&self, text: &str) -> Result<Vec<IndicatorSpec>, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let specs = text
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| self.parse_entry(entry))
            .collect::<Result<Vec<_>, _>>()?;

        if specs.is_empty() {
            return Err(ConfigError::InvalidIndicator {
                spec: text.to_string(),
                reason: "no indicators found".to_string(),
            });
        }

        info!(
            "Parsed {} indicators: {}",
            specs.len(),
            specs
                .iter()
                .map(|s| format!("{}|{}", s.name(), s.color))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(specs)
    }

    /// Parse one `name_period|color` entry.
    pub fn parse_entry(&self, entry: &str) -> Result<IndicatorSpec, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidIndicator {
            spec: entry.to_string(),
            reason,
        };

        let (indicator, color) = match entry.split('|').collect::<Vec<_>>().as_slice() {
            [indicator, color] => (indicator.trim(), color.trim()),
            [_] => {
                return Err(invalid(
                    "missing color (use format: indicator_period|color)".to_string(),
                ))
            }
            _ => return Err(invalid("use format: indicator_period|color".to_string())),
        };

        let (name, period) = match indicator.split('_').collect::<Vec<_>>().as_slice() {
            [name, period] => (name.trim(), period.trim()),
            [_] => {
                return Err(invalid(
                    "missing period (use format: indicator_period)".to_string(),
                ))
            }
            _ => return Err(invalid("use format: indicator_period".to_string())),
        };

        let kind = IndicatorKind::from_name(name).ok_or_else(|| {
            invalid(format!(
                "unsupported indicator '{}'; supported: {}",
                name,
                IndicatorKind::supported().join(", ")
            ))
        })?;

        let period: i64 = period
            .parse()
            .map_err(|_| invalid(format!("period '{}' must be a positive integer", period)))?;
        if period <= 0 {
            return Err(invalid(format!("period must be positive, got {}", period)));
        }
        let period = period as usize;
        if period > MAX_PERIOD {
            return Err(invalid(format!(
                "period {} is too large (maximum: {})",
                period, MAX_PERIOD
            )));
        }

        let color = Color::parse(color).map_err(|e| invalid(e.to_string()))?;

        Ok(IndicatorSpec::new(kind, period, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<IndicatorSpec>, ConfigError> {
        IndicatorParser::new().parse(text)
    }

    #[test]
    fn test_parse_two_indicators() {
        let specs = parse("ema_50|red, EMA_200|#00ff00").unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name(), "ema_50");
        assert_eq!(specs[0].color.as_str(), "#FF0000");
        assert_eq!(specs[1].period, 200);
        assert_eq!(specs[1].color.as_str(), "#00FF00");
    }

    #[test]
    fn test_blank_spec() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
        assert!(parse(" , ").is_err());
        assert_eq!(parse("ema_5|blue,,").unwrap().len(), 1);
    }

    #[test]
    fn test_color_required() {
        let err = parse("ema_50").unwrap_err();
        match err {
            ConfigError::InvalidIndicator { spec, reason } => {
                assert_eq!(spec, "ema_50");
                assert!(reason.contains("missing color"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_period_bounds() {
        assert!(parse("ema_0|red").is_err());
        assert!(parse("ema_-5|red").is_err());
        assert!(parse("ema_1001|red").is_err());
        assert!(parse("ema_abc|red").is_err());
        assert_eq!(parse("ema_1000|red").unwrap()[0].period, 1000);
        assert_eq!(parse("ema_1|red").unwrap()[0].period, 1);
    }

    #[test]
    fn test_unsupported_name_and_color() {
        assert!(parse("sma_20|red").is_err());
        assert!(parse("ema20|red").is_err());
        assert!(parse("ema_20|notacolor").is_err());
        assert!(parse("ema_20|red|2").is_err());
    }

    #[test]
    fn test_error_names_failing_entry() {
        let err = parse("ema_10|red,ema_x|blue").unwrap_err();
        assert!(err.to_string().contains("'ema_x|blue'"));
    }
}
