//! Command-line parsing for the macro forecast comparison.
//!
//! Argument parsing and command dispatch stay separate from the modeling code;
//! `app` turns these structs into a `ReportConfig`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{DEFAULT_HORIZON, DEFAULT_SCREEN_ALPHA, ModelFamily};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "macro-forecast",
    version,
    about = "Lithuanian GDP, inflation and unemployment forecast comparison"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full report: backtest metrics, model comparison, charts and the inflation outlook.
    Report(ReportArgs),
    /// Print the error-metric and Diebold-Mariano tables only.
    Compare(CompareArgs),
    /// Run the inflation predictor screening and VAR outlook only.
    Inflation(InflationArgs),
}

/// Where to find the input panels.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Directory holding the CSV files (default: $MACRO_FORECAST_DATA_DIR or `data`).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Main panel file name inside the data directory.
    #[arg(long, default_value = "main_data.csv")]
    pub main_file: String,

    /// Auxiliary panel file name inside the data directory.
    #[arg(long, default_value = "additional_data.csv")]
    pub aux_file: String,
}

/// Options shared by every backtest command.
#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Forecast steps per window.
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Horizon used in the Diebold-Mariano variance (autocovariances up to lag h-1).
    #[arg(long, default_value_t = 1)]
    pub dm_horizon: usize,

    /// Model families to compare (comma separated; at least two).
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = ModelFamily::ALL)]
    pub models: Vec<ModelFamily>,

    /// Export pooled metrics to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_metrics: Option<PathBuf>,

    /// Export the full report to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for the full report: the comparison plus charts and screening.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub compare: CompareArgs,

    /// Significance level for predictor screening.
    #[arg(long, default_value_t = DEFAULT_SCREEN_ALPHA)]
    pub alpha: f64,

    /// Render ASCII forecast charts (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

/// Options for the inflation screening stage.
#[derive(Debug, Args, Clone)]
pub struct InflationArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Significance level for predictor screening.
    #[arg(long, default_value_t = DEFAULT_SCREEN_ALPHA)]
    pub alpha: f64,

    /// Export the screening results to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}
