//! Error types for the stock chart plotter.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by every pipeline stage.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Errors raised while reading, parsing, or writing data files.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("File error for '{path}': {reason}")]
    File { path: PathBuf, reason: String },

    #[error("Missing required columns: {}", .missing.join(", "))]
    Format { missing: Vec<String> },

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("Invalid timestamp '{text}' (expected format '{pattern}')")]
    Timestamp { text: String, pattern: String },
}

impl DataError {
    /// Build a file error from a path and any displayable cause.
    pub fn file(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::File {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error stems from unparseable content (timestamp or number).
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Timestamp { .. })
    }
}

/// Exchange calendar errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Unsupported exchange code: {0}")]
    UnknownExchange(String),

    #[error("Exchange {exchange} has no trading session on {date}")]
    NoSession { exchange: String, date: NaiveDate },

    #[error("Cannot resolve local time {time} on {date} for exchange {exchange}")]
    InvalidLocalTime {
        exchange: String,
        date: NaiveDate,
        time: String,
    },
}

/// Errors in user-supplied specifications or configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid indicator specification '{spec}': {reason}")]
    InvalidIndicator { spec: String, reason: String },

    #[error("Invalid line specification '{spec}': {reason}")]
    InvalidLine { spec: String, reason: String },

    #[error("Invalid color '{0}'. Use named colors or hex codes (#RRGGBB)")]
    InvalidColor(String),

    #[error("Invalid period {0}: must be a positive integer")]
    InvalidPeriod(i64),

    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

/// Chart surface errors.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart surface unavailable: {0}")]
    Unavailable(String),

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations.
pub type ChartResult<T> = Result<T, ChartError>;
