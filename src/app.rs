//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves the configuration (CLI flags, `.env`, defaults)
//! - runs the pipeline
//! - prints reports/charts
//! - writes optional exports

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Command, CompareArgs, DataArgs, InflationArgs, ReportArgs};
use crate::domain::ReportConfig;
use crate::error::AppError;
use crate::io::{InflationSection, ReportFile};

pub mod pipeline;

/// Environment variable naming the default data directory.
pub const DATA_DIR_ENV: &str = "MACRO_FORECAST_DATA_DIR";

/// Entry point for the `macro-forecast` binary.
pub fn run() -> Result<(), AppError> {
    // `macro-forecast` and `macro-forecast --no-plot` behave like `macro-forecast report ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_tracing(cli.verbose);

    match cli.command {
        Command::Report(args) => handle_report(report_config_from_args(&args), OutputMode::Full),
        Command::Compare(args) => handle_report(compare_config_from_args(&args), OutputMode::CompareOnly),
        Command::Inflation(args) => handle_inflation(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    CompareOnly,
}

fn handle_report(config: ReportConfig, mode: OutputMode) -> Result<(), AppError> {
    let panel = pipeline::load_main_panel(&config)?;
    let comparison = pipeline::run_comparison(&panel.table, &config)?;

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_run_summary(&config, &panel));
    }
    println!(
        "{}",
        crate::report::format_metrics_table(&comparison.summaries, &comparison.comparisons)
    );
    println!("{}", crate::report::format_significance_table(&comparison.comparisons));

    if mode == OutputMode::Full && config.plot {
        for c in &comparison.comparisons {
            let variable = &c.selection.variable;
            let series = panel.table.series(variable)?;
            let actual: Vec<(i32, f64)> = panel.table.coverage().years().zip(series.iter().copied()).collect();
            let forecasts: Vec<_> = comparison
                .backtest
                .forecasts_for(variable)
                .filter(|f| f.family == c.selection.best)
                .collect();
            println!(
                "{}",
                crate::plot::render_forecast_chart(
                    variable,
                    &actual,
                    &forecasts,
                    config.plot_width,
                    config.plot_height
                )
            );
        }
    }

    let outlook = match mode {
        OutputMode::Full => {
            let outlook = pipeline::run_inflation(&config)?;
            println!("{}", crate::report::format_screening(&outlook, config.screen_alpha));
            Some(outlook)
        }
        OutputMode::CompareOnly => None,
    };

    if let Some(path) = &config.export_metrics {
        crate::io::write_metrics_csv(path, &comparison.summaries, &comparison.comparisons)?;
    }
    if let Some(path) = &config.export_json {
        let report = ReportFile {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated_at: Utc::now(),
            source: panel.source.clone(),
            horizon: config.horizon,
            windows: config.windows.clone(),
            metrics: comparison.summaries.clone(),
            comparisons: comparison.comparisons.clone(),
            forecasts: comparison.backtest.forecasts.clone(),
            inflation: outlook.as_ref().map(InflationSection::from),
        };
        crate::io::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_inflation(args: InflationArgs) -> Result<(), AppError> {
    let config = ReportConfig {
        data_dir: resolve_data_dir(&args.data),
        main_file: args.data.main_file.clone(),
        aux_file: args.data.aux_file.clone(),
        screen_alpha: args.alpha,
        ..ReportConfig::default()
    };
    let outlook = pipeline::run_inflation(&config)?;
    println!("{}", crate::report::format_screening(&outlook, config.screen_alpha));

    if let Some(path) = &args.export_json {
        let report = ReportFile {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated_at: Utc::now(),
            source: config.aux_path().display().to_string(),
            horizon: 1,
            windows: Vec::new(),
            metrics: Vec::new(),
            comparisons: Vec::new(),
            forecasts: Vec::new(),
            inflation: Some(InflationSection::from(&outlook)),
        };
        crate::io::write_report_json(path, &report)?;
    }
    Ok(())
}

pub fn report_config_from_args(args: &ReportArgs) -> ReportConfig {
    ReportConfig {
        screen_alpha: args.alpha,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        ..compare_config_from_args(&args.compare)
    }
}

/// Backtest settings only; chart and screening fields keep their defaults.
pub fn compare_config_from_args(args: &CompareArgs) -> ReportConfig {
    ReportConfig {
        data_dir: resolve_data_dir(&args.data),
        main_file: args.data.main_file.clone(),
        aux_file: args.data.aux_file.clone(),
        families: args.models.clone(),
        horizon: args.horizon,
        dm_horizon: args.dm_horizon,
        export_metrics: args.export_metrics.clone(),
        export_json: args.export_json.clone(),
        ..ReportConfig::default()
    }
}

/// `--data-dir`, else `$MACRO_FORECAST_DATA_DIR` (a `.env` file is honored), else `data`.
fn resolve_data_dir(args: &DataArgs) -> PathBuf {
    if let Some(dir) = &args.data_dir {
        return dir.clone();
    }
    dotenvy::dotenv().ok();
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| ReportConfig::default().data_dir)
}

/// stderr logging filtered by `RUST_LOG`, or by the `-v` count when unset.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // A second initialization (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Rewrite argv so `macro-forecast` defaults to `macro-forecast report`.
///
/// Rules (leading `-v`/`--verbose` flags are skipped before deciding):
/// - `macro-forecast`                     -> `macro-forecast report`
/// - `macro-forecast --no-plot ...`       -> `macro-forecast report --no-plot ...`
/// - `macro-forecast --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let first_other = argv
        .iter()
        .skip(1)
        .position(|a| !is_verbosity_flag(a))
        .map(|i| i + 1);

    match first_other {
        Some(i) if is_help_or_version(&argv[i]) => argv,
        Some(i) if matches!(argv[i].as_str(), "report" | "compare" | "inflation") => argv,
        Some(i) if argv[i].starts_with('-') => {
            argv.insert(i, "report".to_string());
            argv
        }
        None => {
            argv.push("report".to_string());
            argv
        }
        _ => argv,
    }
}

fn is_help_or_version(arg: &str) -> bool {
    matches!(arg, "-h" | "--help" | "-V" | "--version" | "help")
}

fn is_verbosity_flag(arg: &str) -> bool {
    arg == "--verbose" || (arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["mf"])), argv(&["mf", "report"]));
        assert_eq!(rewrite_args(argv(&["mf", "--no-plot"])), argv(&["mf", "report", "--no-plot"]));
        assert_eq!(rewrite_args(argv(&["mf", "-v"])), argv(&["mf", "-v", "report"]));
        assert_eq!(
            rewrite_args(argv(&["mf", "-vv", "--horizon", "2"])),
            argv(&["mf", "-vv", "report", "--horizon", "2"])
        );
    }

    #[test]
    fn keeps_explicit_subcommands_and_help() {
        assert_eq!(rewrite_args(argv(&["mf", "compare"])), argv(&["mf", "compare"]));
        assert_eq!(rewrite_args(argv(&["mf", "-v", "inflation"])), argv(&["mf", "-v", "inflation"]));
        assert_eq!(rewrite_args(argv(&["mf", "--help"])), argv(&["mf", "--help"]));
        assert_eq!(rewrite_args(argv(&["mf", "-v", "--help"])), argv(&["mf", "-v", "--help"]));
        assert_eq!(rewrite_args(argv(&["mf", "-vv", "-V"])), argv(&["mf", "-vv", "-V"]));
        assert_eq!(rewrite_args(argv(&["mf", "--verbose", "help"])), argv(&["mf", "--verbose", "help"]));
    }

    #[test]
    fn config_follows_flags() {
        let cli = crate::cli::Cli::parse_from(["mf", "report", "--no-plot", "--data-dir", "/tmp/x", "--horizon", "2"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        let config = report_config_from_args(&args);
        assert!(!config.plot);
        assert_eq!(config.horizon, 2);
        assert_eq!(config.main_path(), PathBuf::from("/tmp/x/main_data.csv"));
        assert_eq!(config.windows.len(), 3);
    }

    #[test]
    fn compare_config_keeps_chart_and_screening_defaults() {
        let cli = crate::cli::Cli::parse_from(["mf", "compare", "--models", "ar1,ma1", "--dm-horizon", "2"]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        let config = compare_config_from_args(&args);
        let defaults = ReportConfig::default();
        assert_eq!(config.families.len(), 2);
        assert_eq!(config.dm_horizon, 2);
        assert_eq!(config.screen_alpha, defaults.screen_alpha);
        assert_eq!((config.plot_width, config.plot_height), (defaults.plot_width, defaults.plot_height));
    }
}
