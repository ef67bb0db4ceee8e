//! MA(1) and ARMA(1,1) with conditional-sum-of-squares innovations.
//!
//! ```text
//! MA(1):     y_t = μ + e_t + θ·e_{t-1}
//! ARMA(1,1): y_t = c + φ·y_{t-1} + e_t + θ·e_{t-1}
//! ```
//!
//! The pre-sample innovation is fixed at zero. For a fixed θ the innovations
//! are the linear filter `u_t = z_t - θ·u_{t-1}` applied to the response and
//! to each regressor, so the remaining coefficients solve an OLS problem on
//! the filtered columns (see `fit::fitter`).

use crate::domain::ModelFamily;
use crate::error::ModelResult;
use crate::models::{FittedModel, ForecastPath, check_horizon};

/// Fitted MA(1) or ARMA(1,1). MA(1) is stored with `phi = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmaModel {
    pub family: ModelFamily,
    pub variable: String,
    pub intercept: f64,
    pub phi: f64,
    pub theta: f64,
    pub sigma2: f64,
    /// Last in-sample observation.
    pub last: f64,
    /// Last in-sample innovation `e_T`.
    pub last_innovation: f64,
}

/// Apply `u_t = z_t - θ·u_{t-1}` with `u_{-1} = 0`.
pub fn inverse_ma_filter(z: &[f64], theta: f64) -> Vec<f64> {
    let mut prev = 0.0;
    z.iter()
        .map(|&v| {
            prev = v - theta * prev;
            prev
        })
        .collect()
}

impl FittedModel for ArmaModel {
    fn family(&self) -> ModelFamily {
        self.family
    }

    fn forecast(&self, horizon: usize) -> ModelResult<Vec<ForecastPath>> {
        check_horizon(horizon)?;
        let mut values = Vec::with_capacity(horizon);
        // Only the first step sees the last innovation; later ones are zero in expectation.
        let mut prev = self.intercept + self.phi * self.last + self.theta * self.last_innovation;
        values.push(prev);
        for _ in 1..horizon {
            prev = self.intercept + self.phi * prev;
            values.push(prev);
        }
        Ok(vec![ForecastPath {
            variable: self.variable.clone(),
            values,
        }])
    }

    fn describe(&self) -> String {
        match self.family {
            ModelFamily::Ma1 => format!(
                "MA(1) {}: mu={:.4} theta={:.4} sigma2={:.4}",
                self.variable, self.intercept, self.theta, self.sigma2
            ),
            _ => format!(
                "ARMA(1,1) {}: c={:.4} phi={:.4} theta={:.4} sigma2={:.4}",
                self.variable, self.intercept, self.phi, self.theta, self.sigma2
            ),
        }
    }
}
