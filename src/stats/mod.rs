//! Statistical tests and regressions.

pub mod diebold_mariano;
pub mod regression;

pub use diebold_mariano::*;
pub use regression::*;

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{ModelError, ModelResult};

/// Two-sided p-value of a t statistic with `dof` degrees of freedom.
pub fn two_sided_t_pvalue(t: f64, dof: usize) -> ModelResult<f64> {
    if dof == 0 {
        return Err(ModelError::InsufficientData { needed: 1, got: 0 });
    }
    if !t.is_finite() {
        return Err(ModelError::NonFinite("t statistic".to_string()));
    }
    let dist = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|e| ModelError::InvalidArgument(format!("Student-t distribution: {e}")))?;
    Ok((2.0 * dist.cdf(-t.abs())).min(1.0))
}
