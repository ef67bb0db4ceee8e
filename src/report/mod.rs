//! Model comparison and terminal reporting.
//!
//! Comparison combines the pooled metrics with the two-model selection and the
//! Diebold-Mariano test on the pooled raw errors of the selected pair. Pairing
//! is positional: both pooled sequences come from the backtest in the same
//! window order, so element `i` of each refers to the same window and step.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::domain::{BestModels, ErrorRecord, MetricSummary, SignificanceResult};
use crate::error::AppError;
use crate::fit::select_best_two;
use crate::score::pooled_errors;
use crate::stats::diebold_mariano;

/// Selection and significance test for one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparison {
    pub selection: BestModels,
    pub significance: SignificanceResult,
}

/// Select the best two families for every variable and test them against each other.
pub fn compare_models(
    records: &[ErrorRecord],
    summaries: &[MetricSummary],
    variables: &[String],
    dm_horizon: usize,
) -> Result<Vec<ModelComparison>, AppError> {
    variables
        .iter()
        .map(|variable| -> Result<ModelComparison, AppError> {
            let selection = select_best_two(variable, summaries)
                .map_err(|e| AppError::from(e).context(format!("selecting models for {variable}")))?;

            let best = pooled_errors(records, selection.best, variable);
            let second = pooled_errors(records, selection.second, variable);
            let dm = diebold_mariano(&best, &second, dm_horizon).map_err(|e| {
                AppError::from(e).context(format!(
                    "Diebold-Mariano {variable} ({} vs {})",
                    selection.best, selection.second
                ))
            })?;

            tracing::info!(
                variable = %variable,
                best = %selection.best,
                second = %selection.second,
                statistic = dm.statistic,
                p_value = dm.p_value,
                "models compared"
            );

            let significance = SignificanceResult {
                variable: variable.clone(),
                best: selection.best,
                second: selection.second,
                statistic: dm.statistic,
                p_value: dm.p_value,
                n: dm.n,
            };
            Ok(ModelComparison { selection, significance })
        })
        .collect()
}
