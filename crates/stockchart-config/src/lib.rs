//! Configuration management and logging setup.

mod logging;
mod settings;

pub use logging::{setup_logging, LogFormat, LoggingGuard};
pub use settings::{ChartSettings, DataSettings, LoggingSettings, Settings};

use config::{Config, Environment, File, FileFormat, Map, Value};
use std::path::Path;
use stockchart_core::ConfigError;

/// Prefix of environment overrides, e.g. `STOCKCHART__CHART__THEME=light`.
pub const ENV_PREFIX: &str = "STOCKCHART";

/// Load settings from an INI file and the environment.
///
/// A missing file yields the defaults. Section and key names are matched
/// without regard to case, and environment values override the file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let file = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini).required(false))
        .build()
        .map_err(load_error)?;
    let env = Config::builder()
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(load_error)?;

    let mut builder = Config::builder();
    for (key, value) in flatten(file.try_deserialize().map_err(load_error)?) {
        builder = builder.set_default(key, value).map_err(load_error)?;
    }
    for (key, value) in flatten(env.try_deserialize().map_err(load_error)?) {
        builder = builder.set_override(key, value).map_err(load_error)?;
    }

    let settings: Settings = builder
        .build()
        .map_err(load_error)?
        .try_deserialize()
        .map_err(load_error)?;
    settings.validate()?;
    Ok(settings)
}

/// Lower-cased `section.key` pairs.
fn flatten(table: Map<String, Value>) -> Vec<(String, Value)> {
    let mut entries = Vec::new();
    for (section, value) in table {
        let section = section.to_lowercase();
        match value.clone().into_table() {
            Ok(inner) => entries.extend(
                inner
                    .into_iter()
                    .map(|(key, v)| (format!("{}.{}", section, key.to_lowercase()), v)),
            ),
            Err(_) => entries.push((section, value)),
        }
    }
    entries
}

fn load_error(err: config::ConfigError) -> ConfigError {
    ConfigError::Load(err.to_string())
}
