//! Forecast/holdout alignment and elementwise errors.
//!
//! Length policy (lossy, never fatal):
//! - forecast longer than holdout: forecast is cut to the holdout length and a
//!   warning is emitted (`ErrorRecord::forecast_truncated` is set);
//! - holdout longer than forecast: holdout is cut to the forecast length.
//!
//! Percent errors divide by the actual value without a zero guard, so a zero
//! actual yields `±inf` (or `NaN` for `0/0`).

use crate::domain::{ErrorRecord, Forecast};

/// Raw and percent errors over the common prefix of `actual` and `forecast`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedErrors {
    pub errors: Vec<f64>,
    pub percent_errors: Vec<f64>,
    pub forecast_truncated: bool,
}

/// `actual − forecast` and `(actual − forecast) / actual`, elementwise.
pub fn forecast_errors(actual: &[f64], forecast: &[f64]) -> AlignedErrors {
    let n = actual.len().min(forecast.len());
    let forecast_truncated = forecast.len() > actual.len();
    if forecast_truncated {
        tracing::warn!(
            forecast_len = forecast.len(),
            holdout_len = actual.len(),
            "forecast longer than holdout; truncating forecast"
        );
    }

    let errors: Vec<f64> = actual[..n]
        .iter()
        .zip(&forecast[..n])
        .map(|(a, f)| a - f)
        .collect();
    let percent_errors: Vec<f64> = errors.iter().zip(&actual[..n]).map(|(e, a)| e / a).collect();

    if percent_errors.iter().any(|v| !v.is_finite()) {
        tracing::warn!("zero actual value; percent error is not finite");
    }

    AlignedErrors {
        errors,
        percent_errors,
        forecast_truncated,
    }
}

/// Score a tagged forecast against holdout actuals starting at the forecast's first year.
pub fn score_forecast(forecast: &Forecast, holdout: &[f64]) -> ErrorRecord {
    let aligned = forecast_errors(holdout, &forecast.values);
    if aligned.forecast_truncated {
        tracing::warn!(
            family = %forecast.family,
            variable = %forecast.variable,
            window = %forecast.window,
            "forecast truncated to holdout"
        );
    }
    ErrorRecord {
        family: forecast.family,
        variable: forecast.variable.clone(),
        window: forecast.window.clone(),
        years: forecast.years().take(aligned.errors.len()).collect(),
        errors: aligned.errors,
        percent_errors: aligned.percent_errors,
        forecast_truncated: aligned.forecast_truncated,
    }
}
