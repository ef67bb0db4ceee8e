//! Robustness backtest over several sample windows.
//!
//! For each window every family is fit on the in-sample years and forecast
//! `horizon` steps past the in-sample end. The forecasts are scored against the
//! holdout actuals (clipped to what the table covers). Univariate fits for
//! different variables are independent and run in parallel. The output keeps
//! window-major, then variable, then family order regardless of scheduling, so
//! pooled error sequences for two families line up pairwise.

use rayon::prelude::*;

use crate::data::ObservationTable;
use crate::domain::{ErrorRecord, Forecast, ModelFamily, SampleWindow};
use crate::error::AppError;
use crate::fit::{fit_univariate, fit_var1};
use crate::models::FittedModel;
use crate::score::score_forecast;

/// Everything produced by one backtest run.
#[derive(Debug, Clone, Default)]
pub struct BacktestOutput {
    pub forecasts: Vec<Forecast>,
    pub records: Vec<ErrorRecord>,
}

impl BacktestOutput {
    pub fn forecasts_for<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a Forecast> + 'a {
        self.forecasts.iter().filter(move |f| f.variable == variable)
    }
}

/// Fit, forecast and score every (window, variable, family).
pub fn run_backtest(
    table: &ObservationTable,
    variables: &[String],
    families: &[ModelFamily],
    windows: &[SampleWindow],
    horizon: usize,
) -> Result<BacktestOutput, AppError> {
    let mut out = BacktestOutput::default();
    for window in windows {
        let forecasts = forecast_window(table, variables, families, window, horizon)?;
        for forecast in forecasts {
            let (covered, actual) = table
                .slice_clipped(&forecast.variable, window.holdout)
                .map_err(|e| AppError::from(e).context(format!("window {}", window.label)))?;
            if actual.is_empty() || covered.start != forecast.first_year {
                return Err(AppError::new(
                    3,
                    format!(
                        "window {}: holdout {} is not covered by the data ({})",
                        window.label,
                        window.holdout,
                        table.coverage()
                    ),
                ));
            }
            out.records.push(score_forecast(&forecast, actual));
            out.forecasts.push(forecast);
        }
        tracing::info!(window = %window.label, in_sample = %window.in_sample, holdout = %window.holdout, "window scored");
    }
    Ok(out)
}

/// Forecasts for one window, ordered by variable then family.
pub fn forecast_window(
    table: &ObservationTable,
    variables: &[String],
    families: &[ModelFamily],
    window: &SampleWindow,
    horizon: usize,
) -> Result<Vec<Forecast>, AppError> {
    let columns = table
        .columns(variables, window.in_sample)
        .map_err(|e| AppError::from(e).context(format!("window {}", window.label)))?;
    let first_year = window.in_sample.end + 1;

    let univariate: Vec<ModelFamily> = families
        .iter()
        .copied()
        .filter(|f| *f != ModelFamily::Var1)
        .collect();

    // Each variable's univariate forecasts, in variable order.
    let per_variable: Vec<Vec<Forecast>> = variables
        .par_iter()
        .zip(columns.par_iter())
        .map(|(variable, y)| {
            univariate
                .iter()
                .map(|&family| -> Result<Forecast, AppError> {
                    let model = fit_univariate(family, variable, y)
                        .map_err(|e| context(e.into(), window, variable, family))?;
                    let values = model
                        .forecast_variable(variable, horizon)
                        .map_err(|e| context(e.into(), window, variable, family))?;
                    Ok(tag(family, variable, window, first_year, values))
                })
                .collect::<Result<Vec<_>, AppError>>()
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let var_paths = if families.contains(&ModelFamily::Var1) {
        let model = fit_var1(variables, &columns).map_err(|e| {
            AppError::from(e).context(format!("window {} / VAR1", window.label))
        })?;
        Some(model.forecast(horizon).map_err(AppError::from)?)
    } else {
        None
    };

    let mut out = Vec::with_capacity(variables.len() * families.len());
    for (variable, forecasts) in variables.iter().zip(per_variable) {
        out.extend(forecasts);
        if let Some(path) = var_paths
            .as_ref()
            .and_then(|paths| paths.iter().find(|p| &p.variable == variable))
        {
            out.push(tag(ModelFamily::Var1, variable, window, first_year, path.values.clone()));
        }
    }
    Ok(out)
}

fn tag(family: ModelFamily, variable: &str, window: &SampleWindow, first_year: i32, values: Vec<f64>) -> Forecast {
    Forecast {
        family,
        variable: variable.to_string(),
        window: window.label.clone(),
        first_year,
        values,
    }
}

fn context(err: AppError, window: &SampleWindow, variable: &str, family: ModelFamily) -> AppError {
    err.context(format!("window {} / {variable} / {family}", window.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearRange;

    fn synthetic_table() -> ObservationTable {
        let years: Vec<i32> = (1990..=2010).collect();
        let n = years.len();
        let wave = |scale: f64, shift: f64| -> Vec<f64> {
            (0..n)
                .map(|i| shift + scale * ((i as f64 * 0.9).sin() + 0.3 * (i as f64 * 2.3).cos()))
                .collect()
        };
        ObservationTable::new(
            &years,
            vec![
                ("a".to_string(), wave(2.0, 5.0)),
                ("b".to_string(), wave(1.0, 3.0).into_iter().rev().collect()),
            ],
        )
        .unwrap()
    }

    fn names() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn output_is_ordered_by_window_variable_family() {
        let windows = vec![
            SampleWindow::new("X", YearRange::new(1990, 2002), YearRange::new(2003, 2006)).unwrap(),
            SampleWindow::new("Y", YearRange::new(1991, 2004), YearRange::new(2005, 2010)).unwrap(),
        ];
        let out = run_backtest(&synthetic_table(), &names(), &ModelFamily::ALL, &windows, 3).unwrap();

        assert_eq!(out.records.len(), 2 * 2 * 4);
        let keys: Vec<(String, String, ModelFamily)> = out
            .records
            .iter()
            .map(|r| (r.window.clone(), r.variable.clone(), r.family))
            .collect();
        assert_eq!(keys[0], ("X".to_string(), "a".to_string(), ModelFamily::Ar1));
        assert_eq!(keys[3], ("X".to_string(), "a".to_string(), ModelFamily::Var1));
        assert_eq!(keys[4], ("X".to_string(), "b".to_string(), ModelFamily::Ar1));
        assert_eq!(keys[8], ("Y".to_string(), "a".to_string(), ModelFamily::Ar1));

        for r in &out.records {
            assert_eq!(r.len(), 3);
            assert!(!r.forecast_truncated);
        }
        assert_eq!(out.forecasts_for("a").count(), 8);
    }

    #[test]
    fn short_holdout_truncates_forecast() {
        let windows = vec![SampleWindow::new("Z", YearRange::new(1990, 2008), YearRange::new(2009, 2010)).unwrap()];
        let out = run_backtest(&synthetic_table(), &names(), &[ModelFamily::Ar1], &windows, 3).unwrap();
        assert_eq!(out.records[0].len(), 2);
        assert!(out.records[0].forecast_truncated);
        assert_eq!(out.records[0].years, vec![2009, 2010]);
    }

    #[test]
    fn uncovered_window_is_coverage_error() {
        let windows = vec![SampleWindow::new("Z", YearRange::new(1985, 2000), YearRange::new(2001, 2003)).unwrap()];
        let err = run_backtest(&synthetic_table(), &names(), &[ModelFamily::Ar1], &windows, 3).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("window Z"));

        let windows = vec![SampleWindow::new("W", YearRange::new(1995, 2010), YearRange::new(2011, 2013)).unwrap()];
        let err = run_backtest(&synthetic_table(), &names(), &[ModelFamily::Ar1], &windows, 3).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn fit_failure_aborts_with_window_context() {
        let windows = vec![SampleWindow::new("Z", YearRange::new(1990, 1991), YearRange::new(1992, 1994)).unwrap()];

        let err = run_backtest(&synthetic_table(), &["a".to_string()], &[ModelFamily::Ar1], &windows, 3).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(
            err.to_string().starts_with("window Z / a / AR1: insufficient data"),
            "{err}"
        );

        let err = run_backtest(&synthetic_table(), &names(), &[ModelFamily::Var1], &windows, 3).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("window Z / VAR1: insufficient data"), "{err}");
    }
}
