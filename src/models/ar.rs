//! AR(1): `y_t = c + φ·y_{t-1} + e_t`.

use crate::domain::ModelFamily;
use crate::error::ModelResult;
use crate::models::{FittedModel, ForecastPath, check_horizon};

#[derive(Debug, Clone, PartialEq)]
pub struct Ar1Model {
    pub variable: String,
    pub intercept: f64,
    pub phi: f64,
    pub sigma2: f64,
    /// Last in-sample observation (forecast origin).
    pub last: f64,
}

impl FittedModel for Ar1Model {
    fn family(&self) -> ModelFamily {
        ModelFamily::Ar1
    }

    fn forecast(&self, horizon: usize) -> ModelResult<Vec<ForecastPath>> {
        check_horizon(horizon)?;
        let mut prev = self.last;
        let values = (0..horizon)
            .map(|_| {
                prev = self.intercept + self.phi * prev;
                prev
            })
            .collect();
        Ok(vec![ForecastPath {
            variable: self.variable.clone(),
            values,
        }])
    }

    fn describe(&self) -> String {
        format!(
            "AR(1) {}: c={:.4} phi={:.4} sigma2={:.4}",
            self.variable, self.intercept, self.phi, self.sigma2
        )
    }
}
