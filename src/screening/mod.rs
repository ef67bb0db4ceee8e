//! Inflation predictor screening and the one-step VAR outlook.
//!
//! Each candidate predictor is tested alone: inflation is regressed on a
//! constant and the predictor over the screening window, and the predictor is
//! kept when the slope's two-sided p-value is strictly below `alpha`. The
//! retained predictors and inflation then form a VAR(1) whose one-step
//! forecast is the outlook for the year after the window.

use crate::data::ObservationTable;
use crate::domain::{PredictorScreen, YearRange};
use crate::error::AppError;
use crate::fit::fit_var1;
use crate::models::Var1Model;
use crate::stats::simple_regression;

/// Result of the screening stage.
#[derive(Debug, Clone)]
pub struct InflationOutlook {
    pub target: String,
    pub window: YearRange,
    pub screens: Vec<PredictorScreen>,
    /// Target first, then retained predictors in screening order.
    pub model_variables: Vec<String>,
    pub model: Var1Model,
    pub forecast_year: i32,
    pub forecast: f64,
}

impl InflationOutlook {
    pub fn retained(&self) -> impl Iterator<Item = &PredictorScreen> {
        self.screens.iter().filter(|s| s.retained)
    }
}

/// Screen every predictor against `target` over `window`.
pub fn screen_predictors(
    table: &ObservationTable,
    target: &str,
    predictors: &[String],
    window: YearRange,
    alpha: f64,
) -> Result<Vec<PredictorScreen>, AppError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(AppError::new(2, format!("significance level must be in (0, 1), got {alpha}")));
    }
    let y = table.slice(target, window)?;

    predictors
        .iter()
        .map(|name| -> Result<PredictorScreen, AppError> {
            let x = table.slice(name, window)?;
            let fit = simple_regression(y, x)
                .map_err(|e| AppError::from(e).context(format!("screening `{name}`")))?;
            let retained = fit.p_value < alpha;
            tracing::debug!(predictor = %name, p_value = fit.p_value, retained, "screened");
            Ok(PredictorScreen {
                predictor: name.clone(),
                coefficient: fit.slope,
                std_error: fit.slope_std_error,
                t_stat: fit.t_stat,
                p_value: fit.p_value,
                retained,
            })
        })
        .collect()
}

/// Screen predictors, fit the VAR(1) on the survivors and forecast one year ahead.
pub fn inflation_outlook(
    table: &ObservationTable,
    target: &str,
    predictors: &[String],
    window: YearRange,
    alpha: f64,
) -> Result<InflationOutlook, AppError> {
    let screens = screen_predictors(table, target, predictors, window, alpha)?;

    let mut model_variables = vec![target.to_string()];
    model_variables.extend(screens.iter().filter(|s| s.retained).map(|s| s.predictor.clone()));
    if model_variables.len() == 1 {
        return Err(AppError::new(
            4,
            format!("no predictor of `{target}` is significant at {alpha}; nothing to model"),
        ));
    }
    tracing::info!(retained = ?&model_variables[1..], "predictors retained");

    let columns = table.columns(&model_variables, window)?;
    let model = fit_var1(&model_variables, &columns)
        .map_err(|e| AppError::from(e).context("inflation VAR(1)"))?;
    let step = model.forecast_joint(1)?;
    let forecast = step.first().map(|v| v[0]).ok_or_else(|| AppError::new(4, "empty VAR forecast"))?;

    Ok(InflationOutlook {
        target: target.to_string(),
        window,
        screens,
        model_variables,
        model,
        forecast_year: window.end + 1,
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    fn table() -> ObservationTable {
        // `lead` tracks the target closely, `noise` does not.
        ObservationTable::new(
            &[2000, 2001, 2002, 2003, 2004, 2005, 2006],
            vec![
                ("inf".to_string(), vec![1.0, 2.2, 2.9, 4.1, 5.0, 5.8, 7.2]),
                ("lead".to_string(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                ("noise".to_string(), vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn keeps_only_significant_predictors() {
        let window = YearRange::new(2000, 2006);
        let screens = screen_predictors(&table(), "inf", &names(&["lead", "noise"]), window, 0.10).unwrap();
        assert_eq!(screens.len(), 2);
        assert!(screens[0].retained);
        assert!(screens[0].p_value < 1e-4);
        assert!(!screens[1].retained);
    }

    #[test]
    fn outlook_forecasts_the_following_year() {
        let window = YearRange::new(2000, 2006);
        let out = inflation_outlook(&table(), "inf", &names(&["lead", "noise"]), window, 0.10).unwrap();
        assert_eq!(out.model_variables, names(&["inf", "lead"]));
        assert_eq!(out.forecast_year, 2007);
        assert_eq!(out.retained().count(), 1);

        let by_hand = out.model.intercepts[0]
            + out.model.coefficients[(0, 0)] * 7.2
            + out.model.coefficients[(0, 1)] * 6.0;
        assert_abs_diff_eq!(out.forecast, by_hand, epsilon = 1e-10);
    }

    #[test]
    fn no_survivor_is_an_error() {
        let window = YearRange::new(2000, 2006);
        let err = inflation_outlook(&table(), "inf", &names(&["noise"]), window, 0.10).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn rejects_bad_alpha_and_missing_series() {
        let window = YearRange::new(2000, 2006);
        assert_eq!(
            screen_predictors(&table(), "inf", &names(&["lead"]), window, 1.5).unwrap_err().exit_code(),
            2
        );
        assert_eq!(
            screen_predictors(&table(), "inf", &names(&["oil"]), window, 0.1).unwrap_err().exit_code(),
            3
        );
    }
}
