//! Stock chart CLI application.

mod cli;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use stockchart_config::{load_settings, setup_logging, LogFormat, LoggingGuard, Settings};
use tracing::{error, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (settings, settings_error) = match load_settings(&cli.config) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    let _guard = match init_logging(&cli, &settings) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(e) = settings_error {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    if !cli.config.exists() {
        warn!(
            "Configuration file {} not found, using defaults",
            cli.config.display()
        );
    }

    let result = if cli.list_exchanges {
        cli::commands::exchanges::run()
    } else {
        cli::commands::chart::run(&cli.chart, &settings)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli, settings: &Settings) -> anyhow::Result<Option<LoggingGuard>> {
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        settings.logging.filter_level()
    };
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        settings.logging.log_format()?
    };

    Ok(setup_logging(
        &level,
        format,
        settings.logging.file.as_deref(),
    )?)
}
