//! Ordinary least squares.
//!
//! Every estimator in this crate reduces to small regression problems:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! - AR(1) and each VAR(1) equation regress on `[1, lagged values]`.
//! - MA(1)/ARMA(1,1) regress filtered data on filtered regressors for a fixed θ.
//! - Predictor screening regresses inflation on `[1, predictor]`.
//!
//! We solve through SVD because the design matrices are tall (more rows than
//! columns) and nalgebra's `QR::solve` only handles square systems. The rank is
//! checked up front so a singular design fails loudly instead of returning a
//! minimum-norm solution.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModelError, ModelResult};

/// Singular values below `RANK_RTOL * σ_max` count as zero.
const RANK_RTOL: f64 = 1e-10;

/// Result of a full-rank OLS fit.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: DVector<f64>,
    pub residuals: DVector<f64>,
    pub sse: f64,
    /// Residual degrees of freedom (`rows - cols`).
    pub dof: usize,
    /// Coefficient standard errors; `None` when `dof == 0`.
    pub std_errors: Option<Vec<f64>>,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system cannot be solved to finite coefficients.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    let tol = RANK_RTOL * svd.singular_values.max();

    match svd.solve(y, tol) {
        Ok(beta) if beta.iter().all(|v| v.is_finite()) => Some(beta),
        _ => None,
    }
}

/// Numerical rank of a design matrix.
pub fn design_rank(x: &DMatrix<f64>) -> usize {
    let svd = x.clone().svd(false, false);
    let tol = RANK_RTOL * svd.singular_values.max();
    svd.rank(tol.max(f64::MIN_POSITIVE))
}

/// Fit `y = X β + e`, requiring a full column rank design and finite inputs.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> ModelResult<OlsFit> {
    let (rows, cols) = x.shape();
    if rows != y.len() {
        return Err(ModelError::InvalidArgument(format!(
            "design has {rows} rows but response has {} values",
            y.len()
        )));
    }
    if rows < cols {
        return Err(ModelError::InsufficientData { needed: cols, got: rows });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite("regression inputs".to_string()));
    }

    let rank = design_rank(x);
    if rank < cols {
        return Err(ModelError::SingularDesign { rank, cols });
    }

    let beta = solve_least_squares(x, y).ok_or(ModelError::SingularDesign { rank, cols })?;
    let residuals = y - x * &beta;
    let sse = residuals.norm_squared();
    let dof = rows - cols;

    let std_errors = if dof > 0 {
        let sigma2 = sse / dof as f64;
        (x.transpose() * x)
            .try_inverse()
            .map(|inv| (0..cols).map(|j| (sigma2 * inv[(j, j)]).sqrt()).collect())
    } else {
        None
    };

    Ok(OlsFit {
        beta,
        residuals,
        sse,
        dof,
        std_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn fit_ols_reports_standard_errors() {
        // y = 1 + 2x + noise with hand-checked residuals.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[1.1, 2.9, 5.1, 6.9]);
        let fit = fit_ols(&x, &y).unwrap();

        assert_abs_diff_eq!(fit.beta[0], 1.06, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.beta[1], 1.96, epsilon = 1e-10);
        assert_eq!(fit.dof, 2);
        assert_abs_diff_eq!(fit.sse, 0.032, epsilon = 1e-10);
        let se = fit.std_errors.unwrap();
        // sigma^2 = 0.016, (X'X)^-1 diagonal = [0.7, 0.2]
        assert_abs_diff_eq!(se[0], (0.016_f64 * 0.7).sqrt(), epsilon = 1e-10);
        assert_abs_diff_eq!(se[1], (0.016_f64 * 0.2).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn fit_ols_rejects_collinear_design() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let err = fit_ols(&x, &y).unwrap_err();
        assert_eq!(err, ModelError::SingularDesign { rank: 1, cols: 2 });
    }

    #[test]
    fn fit_ols_rejects_non_finite() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, f64::NAN]);
        assert!(matches!(fit_ols(&x, &y), Err(ModelError::NonFinite(_))));
    }
}
