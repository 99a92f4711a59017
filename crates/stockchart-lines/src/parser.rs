//! Parser for the `--lines` argument.

use stockchart_core::{Color, ConfigError, LineSpec};
use tracing::{info, warn};

use crate::palette::ColorAllocator;

/// A parsed group before color assignment.
struct RawLine {
    label: String,
    value: f64,
    color: Option<Color>,
    width: u32,
}

/// Parses `label|value|color|width` groups separated by `;` or `,`.
///
/// Only label and value are required: `Support|28.7` or
/// `Resistance|30.5|red|2;Pivot|29.6||3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSpecParser;

impl LineSpecParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse every group, assigning missing colors from `allocator`.
    ///
    /// Explicit colors are reserved before any missing one is assigned, so
    /// an auto-assigned line never repeats a color chosen on the command line.
    pub fn parse(
        &self,
        text: &str,
        allocator: &mut ColorAllocator,
    ) -> Result<Vec<LineSpec>, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let raw = text
            .split([';', ','])
            .map(str::trim)
            .filter(|group| !group.is_empty())
            .map(|group| self.parse_group(group))
            .collect::<Result<Vec<_>, _>>()?;

        if raw.is_empty() {
            return Err(ConfigError::InvalidLine {
                spec: text.to_string(),
                reason: "no lines found".to_string(),
            });
        }

        for color in raw.iter().filter_map(|line| line.color.as_ref()) {
            allocator.mark_used(color);
        }

        let lines: Vec<LineSpec> = raw
            .into_iter()
            .map(|line| {
                let color = line.color.unwrap_or_else(|| allocator.next_color());
                LineSpec::new(line.label, line.value, color, line.width)
            })
            .collect();

        info!(
            "Parsed {} horizontal lines: {}",
            lines.len(),
            lines
                .iter()
                .map(|l| format!("{}={} {} w{}", l.label, l.value, l.color, l.width))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(lines)
    }

    fn parse_group(&self, group: &str) -> Result<RawLine, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidLine {
            spec: group.to_string(),
            reason,
        };

        let fields: Vec<&str> = group.split('|').map(str::trim).collect();
        if fields.len() < 2 {
            return Err(invalid(
                "missing required fields (need at least: label|value)".to_string(),
            ));
        }
        if fields.len() > 4 {
            return Err(invalid(
                "too many fields (maximum: label|value|color|width)".to_string(),
            ));
        }

        let label = fields[0];
        if label.is_empty() {
            return Err(invalid("label cannot be empty".to_string()));
        }

        let value: f64 = fields[1]
            .parse()
            .map_err(|_| invalid(format!("value '{}' must be a number", fields[1])))?;
        if !value.is_finite() {
            return Err(invalid(format!("value '{}' must be finite", fields[1])));
        }

        let color = match fields.get(2) {
            Some(text) if !text.is_empty() => {
                Some(Color::parse(text).map_err(|e| invalid(e.to_string()))?)
            }
            _ => None,
        };

        let width = match fields.get(3) {
            Some(text) if !text.is_empty() => {
                let width: i64 = text
                    .parse()
                    .map_err(|_| invalid(format!("width '{}' must be an integer", text)))?;
                if width <= 0 {
                    warn!("Line '{}': width {} is not positive, using 1", label, width);
                    1
                } else {
                    u32::try_from(width)
                        .map_err(|_| invalid(format!("width {} is too large", width)))?
                }
            }
            _ => 1,
        };

        Ok(RawLine {
            label: label.to_string(),
            value,
            color,
            width,
        })
    }
}
