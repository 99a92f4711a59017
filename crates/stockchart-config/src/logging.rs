//! Logging setup.

use std::io;
use std::path::Path;
use std::str::FromStr;
use stockchart_core::ConfigError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

/// Keeps the log file writer flushing until dropped.
pub type LoggingGuard = WorkerGuard;

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                reason: format!("expected pretty, compact or json, got '{}'", other),
            }),
        }
    }
}

/// Setup logging with the given level.
///
/// Logs go to stderr so they never mix with the chart on stdout. `RUST_LOG`
/// takes precedence over `level`. When `file` is set, a second plain-text
/// layer writes there through a non-blocking appender whose guard must be
/// held for the life of the program.
pub fn setup_logging(
    level: &str,
    format: LogFormat,
    file: Option<&Path>,
) -> Result<Option<LoggingGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
    });

    let mut guard = None;
    if let Some(path) = file.filter(|p| !p.as_os_str().is_empty()) {
        let file_name = path.file_name().ok_or_else(|| ConfigError::InvalidValue {
            key: "logging.file".to_string(),
            reason: format!("'{}' is not a file path", path.display()),
        })?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, worker) = tracing_appender::non_blocking(appender);
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
        guard = Some(worker);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ConfigError::Load(format!("failed to initialize logging: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("%(asctime)s - %(message)s".parse::<LogFormat>().is_err());
    }
}
