//! Simple linear regression with coefficient inference.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModelError, ModelResult};
use crate::math::fit_ols;
use crate::stats::two_sided_t_pvalue;

/// Residual sum of squares below this fraction of the total counts as an exact fit.
const PERFECT_FIT_RTOL: f64 = 1e-20;

/// `y = a + b·x + e` with inference on `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleRegression {
    pub intercept: f64,
    pub slope: f64,
    pub slope_std_error: f64,
    pub t_stat: f64,
    /// Two-sided p-value for `b = 0`, Student-t with `n − 2` degrees of freedom.
    pub p_value: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Regress `y` on a constant and `x`.
pub fn simple_regression(y: &[f64], x: &[f64]) -> ModelResult<SimpleRegression> {
    if y.len() != x.len() {
        return Err(ModelError::InvalidArgument(format!(
            "response has {} values, predictor has {}",
            y.len(),
            x.len()
        )));
    }
    let n = y.len();
    if n < 3 {
        return Err(ModelError::InsufficientData { needed: 3, got: n });
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let response = DVector::from_column_slice(y);
    let fit = fit_ols(&design, &response)?;

    let se = fit
        .std_errors
        .as_ref()
        .map(|se| se[1])
        .ok_or_else(|| ModelError::DegenerateTest("no residual degrees of freedom".to_string()))?;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let sst: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    if !(se.is_finite() && se > 0.0) || fit.sse <= PERFECT_FIT_RTOL * sst {
        return Err(ModelError::DegenerateTest(
            "slope standard error is zero (perfect fit)".to_string(),
        ));
    }

    let slope = fit.beta[1];
    let t_stat = slope / se;
    let p_value = two_sided_t_pvalue(t_stat, fit.dof)?;
    let r_squared = 1.0 - fit.sse / sst;

    Ok(SimpleRegression {
        intercept: fit.beta[0],
        slope,
        slope_std_error: se,
        t_stat,
        p_value,
        r_squared,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn slope_inference_matches_hand_computation() {
        // Same data as the OLS unit test: slope 1.96, se sqrt(0.016 * 0.2).
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.1, 2.9, 5.1, 6.9];
        let r = simple_regression(&y, &x).unwrap();
        let se = (0.016_f64 * 0.2).sqrt();
        assert_abs_diff_eq!(r.slope, 1.96, epsilon = 1e-10);
        assert_abs_diff_eq!(r.slope_std_error, se, epsilon = 1e-10);
        assert_abs_diff_eq!(r.t_stat, 1.96 / se, epsilon = 1e-8);
        assert!(r.p_value < 0.01);
        assert!(r.r_squared > 0.99);
    }

    #[test]
    fn unrelated_predictor_is_insignificant() {
        let x = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let y = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0];
        let r = simple_regression(&y, &x).unwrap();
        assert_abs_diff_eq!(r.slope, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.p_value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn perfect_fit_is_degenerate() {
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 4.0, 6.0];
        assert!(matches!(simple_regression(&y, &x), Err(ModelError::DegenerateTest(_))));
    }
}
