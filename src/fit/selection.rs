//! Model selection: the two lowest-RMSE families per variable.
//!
//! Ranking is by ascending pooled RMSE. The sort is stable and the input is
//! put in family enumeration order first, so exact ties resolve as
//! AR1, MA1, ARMA1, VAR1. NaN RMSEs rank last.

use std::cmp::Ordering;

use crate::domain::{BestModels, MetricSummary};
use crate::error::{ModelError, ModelResult};

/// Rank the summaries of one variable by ascending RMSE.
pub fn rank_by_rmse(summaries: &[MetricSummary]) -> Vec<MetricSummary> {
    let mut ranked = summaries.to_vec();
    ranked.sort_by_key(|s| s.family);
    ranked.sort_by(|a, b| cmp_rmse(a.metrics.rmse, b.metrics.rmse));
    ranked
}

/// Select the best and second-best family for `variable`.
pub fn select_best_two(variable: &str, summaries: &[MetricSummary]) -> ModelResult<BestModels> {
    let own: Vec<MetricSummary> = summaries
        .iter()
        .filter(|s| s.variable == variable)
        .cloned()
        .collect();
    if own.len() < 2 {
        return Err(ModelError::InsufficientData {
            needed: 2,
            got: own.len(),
        });
    }

    let ranked = rank_by_rmse(&own);
    Ok(BestModels {
        variable: variable.to_string(),
        best: ranked[0].family,
        second: ranked[1].family,
        best_rmse: ranked[0].metrics.rmse,
        second_rmse: ranked[1].metrics.rmse,
    })
}

fn cmp_rmse(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorMetrics, ModelFamily};

    fn summary(family: ModelFamily, rmse: f64) -> MetricSummary {
        MetricSummary {
            family,
            variable: "gdp".to_string(),
            metrics: ErrorMetrics {
                n: 9,
                mse: rmse * rmse,
                rmse,
                mae: 0.0,
                mspe: 0.0,
                rmspe: 0.0,
                mape: 0.0,
            },
        }
    }

    #[test]
    fn picks_two_lowest_ascending() {
        let s = vec![
            summary(ModelFamily::Ar1, 2.0),
            summary(ModelFamily::Ma1, 1.0),
            summary(ModelFamily::Arma1, 3.0),
            summary(ModelFamily::Var1, 1.5),
        ];
        let best = select_best_two("gdp", &s).unwrap();
        assert_eq!(best.best, ModelFamily::Ma1);
        assert_eq!(best.second, ModelFamily::Var1);
        assert_eq!(best.best_rmse, 1.0);
    }

    #[test]
    fn exact_ties_follow_enumeration_order() {
        // Deliberately shuffled input.
        let s = vec![
            summary(ModelFamily::Var1, 1.0),
            summary(ModelFamily::Arma1, 1.0),
            summary(ModelFamily::Ma1, 1.0),
            summary(ModelFamily::Ar1, 2.0),
        ];
        let best = select_best_two("gdp", &s).unwrap();
        assert_eq!(best.best, ModelFamily::Ma1);
        assert_eq!(best.second, ModelFamily::Arma1);
    }

    #[test]
    fn nan_ranks_last() {
        let s = vec![
            summary(ModelFamily::Ar1, f64::NAN),
            summary(ModelFamily::Ma1, 5.0),
            summary(ModelFamily::Arma1, 4.0),
        ];
        let ranked = rank_by_rmse(&s);
        assert_eq!(ranked[2].family, ModelFamily::Ar1);
    }

    #[test]
    fn needs_two_candidates() {
        let s = vec![summary(ModelFamily::Ar1, 1.0)];
        assert!(select_best_two("gdp", &s).is_err());
        assert!(select_best_two("inf", &s).is_err());
    }
}
