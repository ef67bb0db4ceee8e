//! VAR(1): `Y_t = c + A·Y_{t-1} + E_t`, estimated equation by equation.

use nalgebra::{DMatrix, DVector};

use crate::domain::ModelFamily;
use crate::error::ModelResult;
use crate::models::{FittedModel, ForecastPath, check_horizon};

#[derive(Debug, Clone, PartialEq)]
pub struct Var1Model {
    pub variables: Vec<String>,
    pub intercepts: DVector<f64>,
    /// Row `i` holds equation `i`'s coefficients on the lagged vector.
    pub coefficients: DMatrix<f64>,
    /// Residual variance per equation.
    pub sigma2: Vec<f64>,
    /// Last in-sample observation vector.
    pub last: DVector<f64>,
}

impl Var1Model {
    /// Joint forecasts, one vector per step.
    pub fn forecast_joint(&self, horizon: usize) -> ModelResult<Vec<DVector<f64>>> {
        check_horizon(horizon)?;
        let mut out = Vec::with_capacity(horizon);
        let mut prev = self.last.clone();
        for _ in 0..horizon {
            prev = &self.intercepts + &self.coefficients * &prev;
            out.push(prev.clone());
        }
        Ok(out)
    }
}

impl FittedModel for Var1Model {
    fn family(&self) -> ModelFamily {
        ModelFamily::Var1
    }

    fn forecast(&self, horizon: usize) -> ModelResult<Vec<ForecastPath>> {
        let joint = self.forecast_joint(horizon)?;
        Ok(self
            .variables
            .iter()
            .enumerate()
            .map(|(i, name)| ForecastPath {
                variable: name.clone(),
                values: joint.iter().map(|step| step[i]).collect(),
            })
            .collect())
    }

    fn describe(&self) -> String {
        let eqs: Vec<String> = self
            .variables
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let terms: Vec<String> = self
                    .variables
                    .iter()
                    .enumerate()
                    .map(|(j, lag)| format!("{:+.4}*{lag}[-1]", self.coefficients[(i, j)]))
                    .collect();
                format!("{name} = {:.4} {}", self.intercepts[i], terms.join(" "))
            })
            .collect();
        format!("VAR(1) [{}]", eqs.join("; "))
    }
}
