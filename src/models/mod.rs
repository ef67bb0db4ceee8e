//! Fitted time-series models.
//!
//! Every family implements [`FittedModel`], so the backtest can iterate over
//! families without special-casing the multivariate one: VAR(1) simply returns
//! one path per series and callers pick the variable they score.

pub mod ar;
pub mod arma;
pub mod var;

pub use ar::*;
pub use arma::*;
pub use var::*;

use crate::domain::ModelFamily;
use crate::error::{ModelError, ModelResult};

/// Point forecasts for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPath {
    pub variable: String,
    pub values: Vec<f64>,
}

/// An immutable, fitted model.
pub trait FittedModel: std::fmt::Debug + Send + Sync {
    fn family(&self) -> ModelFamily;

    /// Recursive multi-step point forecasts, one path per modeled series.
    fn forecast(&self, horizon: usize) -> ModelResult<Vec<ForecastPath>>;

    /// One-line parameter summary.
    fn describe(&self) -> String;

    /// Forecast path of a single series.
    fn forecast_variable(&self, variable: &str, horizon: usize) -> ModelResult<Vec<f64>> {
        self.forecast(horizon)?
            .into_iter()
            .find(|p| p.variable == variable)
            .map(|p| p.values)
            .ok_or_else(|| ModelError::MissingSeries(variable.to_string()))
    }
}

pub(crate) fn check_horizon(horizon: usize) -> ModelResult<()> {
    if horizon == 0 {
        return Err(ModelError::InvalidArgument("forecast horizon must be >= 1".to_string()));
    }
    Ok(())
}
