//! CLI definitions.

pub mod commands;

use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stockchart")]
#[command(
    author,
    version,
    about = "Plot OHLCV CSV data filtered to exchange trading hours"
)]
pub struct Cli {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Configuration file path
    #[arg(short, long, default_value = "settings.ini")]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Print the supported exchange codes and exit
    #[arg(long)]
    pub list_exchanges: bool,
}

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// OHLCV CSV file
    #[arg(short, long, required_unless_present = "list_exchanges")]
    pub input: Option<PathBuf>,

    /// Exchange code, e.g. XETR or NYSE
    #[arg(short, long, required_unless_present = "list_exchanges")]
    pub exchange: Option<String>,

    /// Number of latest days to show
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,

    /// EMA overlays, e.g. "ema_20|blue,ema_50|red"
    #[arg(long)]
    pub indicators: Option<String>,

    /// Horizontal lines, e.g. "Support|150.5|green|2;Resistance|160"
    #[arg(long)]
    pub lines: Option<String>,

    /// Write JSON here instead of showing the chart
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
