//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stockchart_core::ConfigError;

use crate::logging::LogFormat;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Reject values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.date_format.trim().is_empty() {
            return Err(invalid("data.date_format", "must not be empty"));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(invalid("chart.width/height", "must be positive"));
        }
        if !matches!(self.chart.theme.to_lowercase().as_str(), "dark" | "light") {
            return Err(invalid(
                "chart.theme",
                &format!("expected 'dark' or 'light', got '{}'", self.chart.theme),
            ));
        }
        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "warning" | "error" | "off"
        ) {
            return Err(invalid(
                "logging.level",
                &format!("unknown level '{}'", self.logging.level),
            ));
        }
        self.logging.log_format()?;
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// `[DATA]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// chrono strftime pattern of the `Local time` column
    pub date_format: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            date_format: "%d.%m.%Y %H:%M:%S%.3f GMT%z".to_string(),
        }
    }
}

/// `[CHART]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Maximum chart width in terminal cells
    pub width: u16,
    /// Maximum chart height in terminal cells
    pub height: u16,
    pub theme: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 160,
            height: 48,
            theme: "dark".to_string(),
        }
    }
}

/// `[LOGGING]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
    pub file: Option<PathBuf>,
}

impl LoggingSettings {
    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        self.format.parse()
    }

    /// Level name understood by `EnvFilter`.
    pub fn filter_level(&self) -> String {
        match self.level.to_lowercase().as_str() {
            "warning" => "warn".to_string(),
            other => other.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.chart.width, 160);
        assert_eq!(settings.logging.log_format().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.chart.theme = "neon".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.chart.height = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_filter_level() {
        let logging = LoggingSettings {
            level: "WARNING".to_string(),
            ..LoggingSettings::default()
        };
        assert_eq!(logging.filter_level(), "warn");
    }
}
