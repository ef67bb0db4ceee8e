//! Estimation routines for each model family.
//!
//! - AR(1): OLS of `y_t` on `[1, y_{t-1}]`.
//! - MA(1) / ARMA(1,1): conditional sum of squares. For each θ on a grid we
//!   filter the response and regressors and solve OLS for the linear
//!   coefficients; the best θ (lowest SSE, ties by grid index) is then polished
//!   by golden-section search within one grid step.
//! - VAR(1): OLS of each series on `[1, Y_{t-1}']`.
//!
//! Every routine validates the window first: too few observations or a
//! non-finite value is an error, never a silent skip.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::ModelFamily;
use crate::error::{ModelError, ModelResult};
use crate::fit::theta_grid::{DEFAULT_THETA_STEPS, THETA_BOUND, theta_grid, theta_step};
use crate::math::{fit_ols, golden_section_min};
use crate::models::{Ar1Model, ArmaModel, FittedModel, Var1Model, inverse_ma_filter};

/// Options for the θ search used by MA(1) and ARMA(1,1).
#[derive(Debug, Clone, Copy)]
pub struct ThetaSearch {
    pub grid_steps: usize,
    pub refine_iters: usize,
}

impl Default for ThetaSearch {
    fn default() -> Self {
        Self {
            grid_steps: DEFAULT_THETA_STEPS,
            refine_iters: 60,
        }
    }
}

/// Conditional-sum-of-squares solution for a fixed θ.
#[derive(Debug, Clone)]
struct CssFit {
    theta: f64,
    beta: DVector<f64>,
    sse: f64,
    residuals: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    theta: f64,
    sse: f64,
}

/// Fit a univariate family (AR1, MA1, ARMA1) to one series.
pub fn fit_univariate(family: ModelFamily, variable: &str, y: &[f64]) -> ModelResult<Box<dyn FittedModel>> {
    let model: Box<dyn FittedModel> = match family {
        ModelFamily::Ar1 => Box::new(fit_ar1(variable, y)?),
        ModelFamily::Ma1 => Box::new(fit_ma1(variable, y, ThetaSearch::default())?),
        ModelFamily::Arma1 => Box::new(fit_arma1(variable, y, ThetaSearch::default())?),
        ModelFamily::Var1 => {
            return Err(ModelError::InvalidArgument(
                "VAR(1) is fit jointly; use fit_var1".to_string(),
            ));
        }
    };
    tracing::debug!(model = %model.describe(), "fitted");
    Ok(model)
}

/// AR(1) by OLS on the lagged series.
pub fn fit_ar1(variable: &str, y: &[f64]) -> ModelResult<Ar1Model> {
    validate_window(ModelFamily::Ar1, variable, y, 1)?;
    let rows = y.len() - 1;

    let x = DMatrix::from_fn(rows, 2, |i, j| if j == 0 { 1.0 } else { y[i] });
    let response = DVector::from_column_slice(&y[1..]);
    let fit = fit_ols(&x, &response)?;

    Ok(Ar1Model {
        variable: variable.to_string(),
        intercept: fit.beta[0],
        phi: fit.beta[1],
        sigma2: fit.sse / rows as f64,
        last: y[y.len() - 1],
    })
}

/// MA(1) by conditional sum of squares.
pub fn fit_ma1(variable: &str, y: &[f64], search: ThetaSearch) -> ModelResult<ArmaModel> {
    validate_window(ModelFamily::Ma1, variable, y, 1)?;
    let ones = vec![1.0; y.len()];
    let css = css_search(y, &[ones], search)?;

    Ok(ArmaModel {
        family: ModelFamily::Ma1,
        variable: variable.to_string(),
        intercept: css.beta[0],
        phi: 0.0,
        theta: css.theta,
        sigma2: css.sse / y.len() as f64,
        last: y[y.len() - 1],
        last_innovation: css.residuals[css.residuals.len() - 1],
    })
}

/// ARMA(1,1) by conditional sum of squares, conditioning on the first observation.
pub fn fit_arma1(variable: &str, y: &[f64], search: ThetaSearch) -> ModelResult<ArmaModel> {
    validate_window(ModelFamily::Arma1, variable, y, 1)?;
    let rows = y.len() - 1;
    let ones = vec![1.0; rows];
    let lagged = y[..rows].to_vec();
    let css = css_search(&y[1..], &[ones, lagged], search)?;

    Ok(ArmaModel {
        family: ModelFamily::Arma1,
        variable: variable.to_string(),
        intercept: css.beta[0],
        phi: css.beta[1],
        theta: css.theta,
        sigma2: css.sse / rows as f64,
        last: y[y.len() - 1],
        last_innovation: css.residuals[css.residuals.len() - 1],
    })
}

/// VAR(1) with intercept, equation by equation.
///
/// `columns[i]` is the in-sample history of `variables[i]`; all must have equal length.
pub fn fit_var1(variables: &[String], columns: &[Vec<f64>]) -> ModelResult<Var1Model> {
    let k = variables.len();
    if k == 0 || columns.len() != k {
        return Err(ModelError::InvalidArgument(format!(
            "VAR(1) needs one column per variable ({} names, {} columns)",
            k,
            columns.len()
        )));
    }
    let n = columns[0].len();
    for (name, col) in variables.iter().zip(columns) {
        if col.len() != n {
            return Err(ModelError::InvalidArgument(format!(
                "series `{name}` has {} observations, expected {n}",
                col.len()
            )));
        }
        validate_window(ModelFamily::Var1, name, col, k)?;
    }

    let rows = n - 1;
    let x = DMatrix::from_fn(rows, k + 1, |t, j| if j == 0 { 1.0 } else { columns[j - 1][t] });

    let mut intercepts = DVector::zeros(k);
    let mut coefficients = DMatrix::zeros(k, k);
    let mut sigma2 = Vec::with_capacity(k);
    for (i, col) in columns.iter().enumerate() {
        let response = DVector::from_column_slice(&col[1..]);
        let fit = fit_ols(&x, &response)?;
        intercepts[i] = fit.beta[0];
        for j in 0..k {
            coefficients[(i, j)] = fit.beta[j + 1];
        }
        sigma2.push(fit.sse / rows as f64);
    }

    let last = DVector::from_iterator(k, columns.iter().map(|c| c[n - 1]));
    let model = Var1Model {
        variables: variables.to_vec(),
        intercepts,
        coefficients,
        sigma2,
        last,
    };
    tracing::debug!(model = %model.describe(), "fitted");
    Ok(model)
}

fn validate_window(family: ModelFamily, variable: &str, y: &[f64], n_series: usize) -> ModelResult<()> {
    let needed = family.param_count(n_series);
    if y.len() < needed {
        return Err(ModelError::InsufficientData { needed, got: y.len() });
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite(format!("series `{variable}`")));
    }
    Ok(())
}

fn css_search(response: &[f64], regressors: &[Vec<f64>], search: ThetaSearch) -> ModelResult<CssFit> {
    // θ = 0 is plain OLS; surface design problems here instead of as an empty grid.
    css_at(0.0, response, regressors)?;

    let grid = theta_grid(search.grid_steps)?;

    // Evaluate each θ independently (parallel).
    let candidates: Vec<Candidate> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &theta)| {
            css_at(theta, response, regressors)
                .ok()
                .filter(|fit| fit.sse.is_finite())
                .map(|fit| Candidate { idx, theta, sse: fit.sse })
        })
        .collect();

    let Some(first) = candidates.first() else {
        return Err(ModelError::NonFinite("conditional sum of squares".to_string()));
    };

    // Deterministic selection: minimum SSE, ties broken by grid index.
    let mut best = *first;
    for c in &candidates[1..] {
        if c.sse < best.sse || (c.sse == best.sse && c.idx < best.idx) {
            best = *c;
        }
    }

    let step = theta_step(search.grid_steps);
    let lo = (best.theta - step).max(-THETA_BOUND);
    let hi = (best.theta + step).min(THETA_BOUND);
    let (refined, refined_sse) = golden_section_min(
        |theta| {
            css_at(theta, response, regressors)
                .map(|fit| fit.sse)
                .unwrap_or(f64::INFINITY)
        },
        lo,
        hi,
        search.refine_iters,
    );

    let theta = if refined_sse <= best.sse { refined } else { best.theta };
    css_at(theta, response, regressors)
}

fn css_at(theta: f64, response: &[f64], regressors: &[Vec<f64>]) -> ModelResult<CssFit> {
    let rows = response.len();
    let filtered_y = inverse_ma_filter(response, theta);

    let mut x = DMatrix::<f64>::zeros(rows, regressors.len());
    for (j, col) in regressors.iter().enumerate() {
        for (i, v) in inverse_ma_filter(col, theta).into_iter().enumerate() {
            x[(i, j)] = v;
        }
    }

    let fit = fit_ols(&x, &DVector::from_vec(filtered_y))?;
    Ok(CssFit {
        theta,
        sse: fit.sse,
        residuals: fit.residuals.iter().copied().collect(),
        beta: fit.beta,
    })
}
