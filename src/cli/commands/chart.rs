//! Chart command: load, filter, then export or display.

use anyhow::{bail, Context, Result};
use std::path::Path;
use stockchart_calendar::ExchangeCalendars;
use stockchart_config::Settings;
use stockchart_data::{CsvReader, TimestampFormat};
use stockchart_export::validate_output_path;
use stockchart_pipeline::{ChartPipeline, ChartRequest};
use stockchart_render::{chart_title, ChartOptions, TerminalSurface, Theme};
use tracing::info;

use crate::cli::ChartArgs;

pub fn run(args: &ChartArgs, settings: &Settings) -> Result<()> {
    let input = args.input.as_deref().context("--input is required")?;
    let exchange = args.exchange.as_deref().context("--exchange is required")?;
    check_input(input)?;

    if let Some(output) = &args.output {
        validate_output_path(output)
            .with_context(|| format!("Invalid output path {}", output.display()))?;
    }

    let reader = CsvReader::new(TimestampFormat::new(settings.data.date_format.clone()));
    let mut pipeline = ChartPipeline::new(ExchangeCalendars::new(), reader);

    let request = ChartRequest {
        input: input.to_path_buf(),
        exchange: exchange.to_string(),
        days: args.days as usize,
        indicators: args.indicators.clone(),
        lines: args.lines.clone(),
    };
    let chart = pipeline.prepare(&request)?;

    match &args.output {
        Some(output) => {
            pipeline.export(&chart, output)?;
            info!("Chart data written to {}", output.display());
        }
        None => {
            let theme: Theme = settings.chart.theme.parse()?;
            let options = ChartOptions {
                title: chart_title(&chart.exchange, &chart.series),
                width: settings.chart.width,
                height: settings.chart.height,
                theme,
            };
            let mut surface = TerminalSurface::new(options)?;
            pipeline.render(&chart, &mut surface)?;
        }
    }

    Ok(())
}

fn check_input(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("Input file not found: {}", path.display());
    }
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("Input file must have a .csv extension: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = dir.path().join("prices.CSV");
        std::fs::write(&csv, "Local time,Open,High,Low,Close,Volume\n").unwrap();
        assert!(check_input(&csv).is_ok());

        let txt = dir.path().join("prices.txt");
        std::fs::write(&txt, "").unwrap();
        assert!(check_input(&txt).is_err());

        assert!(check_input(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_export_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = dir.path().join("prices.csv");
        let mut text = String::from("Local time,Open,High,Low,Close,Volume\n");
        for hour in 8..20 {
            text.push_str(&format!(
                "01.07.2025 {:02}:00:00.000 GMT+0200,100,101,99,100.5,10\n",
                hour
            ));
        }
        std::fs::write(&csv, text).unwrap();
        let output = dir.path().join("out").join("chart.json");

        let args = ChartArgs {
            input: Some(csv),
            exchange: Some("xetra".to_string()),
            days: 1,
            indicators: None,
            lines: Some("Pivot|100".to_string()),
            output: Some(output.clone()),
        };
        run(&args, &Settings::default()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        // XETR session 09:00-17:30 local
        assert_eq!(json["metadata"]["data_points_count"], 9);
        assert_eq!(json["metadata"]["exchange_code"], "XETRA");
        assert_eq!(json["metadata"]["filtered_to_trading_hours"], true);
    }
}
