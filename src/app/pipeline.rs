//! Shared pipeline logic used by every subcommand.
//!
//! Keeping the workflow in one place avoids duplicating it across commands:
//! load panel -> backtest every window -> pool and aggregate -> select and test;
//! load auxiliary panel -> screen predictors -> VAR outlook.
//!
//! Commands then only decide what to print or export.

use crate::backtest::{BacktestOutput, run_backtest};
use crate::data::ObservationTable;
use crate::domain::{MetricSummary, ReportConfig};
use crate::error::AppError;
use crate::io::{IngestedPanel, load_panel};
use crate::report::{ModelComparison, compare_models};
use crate::score::summarize;
use crate::screening::{InflationOutlook, inflation_outlook};

/// Outputs of the backtest and model comparison.
#[derive(Debug, Clone)]
pub struct ComparisonOutput {
    pub backtest: BacktestOutput,
    pub summaries: Vec<MetricSummary>,
    pub comparisons: Vec<ModelComparison>,
}

/// All computed outputs of a full `report` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub panel: IngestedPanel,
    pub comparison: ComparisonOutput,
    pub outlook: InflationOutlook,
}

/// Execute the full pipeline from the configured files.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    let panel = load_main_panel(config)?;
    let comparison = run_comparison(&panel.table, config)?;
    let outlook = run_inflation(config)?;
    Ok(RunOutput {
        panel,
        comparison,
        outlook,
    })
}

/// Load the main panel with the configured variables.
pub fn load_main_panel(config: &ReportConfig) -> Result<IngestedPanel, AppError> {
    load_panel(&config.main_path(), &config.variables)
}

/// Backtest, aggregate and compare on an already loaded table.
pub fn run_comparison(table: &ObservationTable, config: &ReportConfig) -> Result<ComparisonOutput, AppError> {
    validate(config)?;

    let backtest = run_backtest(table, &config.variables, &config.families, &config.windows, config.horizon)?;
    let summaries = summarize(&backtest.records, &config.variables, &config.families)?;
    let comparisons = compare_models(&backtest.records, &summaries, &config.variables, config.dm_horizon)?;

    Ok(ComparisonOutput {
        backtest,
        summaries,
        comparisons,
    })
}

/// Load the auxiliary panel and run predictor screening plus the VAR outlook.
pub fn run_inflation(config: &ReportConfig) -> Result<InflationOutlook, AppError> {
    let mut required = vec![config.screen_target.clone()];
    required.extend(config.predictors.iter().cloned());
    let panel = load_panel(&config.aux_path(), &required)?;
    run_inflation_on(&panel.table, config)
}

/// Predictor screening plus the VAR outlook on an already loaded table.
pub fn run_inflation_on(table: &ObservationTable, config: &ReportConfig) -> Result<InflationOutlook, AppError> {
    let outlook = inflation_outlook(
        table,
        &config.screen_target,
        &config.predictors,
        config.screen_window,
        config.screen_alpha,
    )?;
    tracing::info!(
        year = outlook.forecast_year,
        forecast = outlook.forecast,
        "inflation outlook"
    );
    Ok(outlook)
}

fn validate(config: &ReportConfig) -> Result<(), AppError> {
    if config.horizon == 0 {
        return Err(AppError::new(2, "--horizon must be at least 1."));
    }
    if config.dm_horizon == 0 {
        return Err(AppError::new(2, "--dm-horizon must be at least 1."));
    }
    let mut families = config.families.clone();
    families.sort();
    families.dedup();
    if families.len() != config.families.len() {
        return Err(AppError::new(2, "--models lists a family more than once."));
    }
    if families.len() < 2 {
        return Err(AppError::new(2, "At least two model families are needed for a comparison."));
    }
    if config.windows.is_empty() {
        return Err(AppError::new(2, "No sample windows configured."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelFamily;

    #[test]
    fn rejects_invalid_configs() {
        let table = ObservationTable::new(&[2000], vec![("gdp".to_string(), vec![1.0])]).unwrap();

        let config = ReportConfig { horizon: 0, ..ReportConfig::default() };
        assert_eq!(run_comparison(&table, &config).unwrap_err().exit_code(), 2);

        let config = ReportConfig { families: vec![ModelFamily::Ar1], ..ReportConfig::default() };
        assert_eq!(run_comparison(&table, &config).unwrap_err().exit_code(), 2);

        let config = ReportConfig {
            families: vec![ModelFamily::Ar1, ModelFamily::Ar1],
            ..ReportConfig::default()
        };
        assert_eq!(run_comparison(&table, &config).unwrap_err().exit_code(), 2);
    }
}
