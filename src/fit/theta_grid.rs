//! Grid over the moving-average coefficient θ.
//!
//! MA(1) and ARMA(1,1) are fit by a deterministic grid search over θ followed
//! by a local golden-section refinement. The grid spans the invertible region
//! `|θ| < 1`, stopping slightly short of the unit circle where the conditional
//! sum of squares becomes flat and the filter stops forgetting its start value.

use crate::error::{ModelError, ModelResult};

/// Largest |θ| considered.
pub const THETA_BOUND: f64 = 0.99;

/// Default number of grid points (step 0.01 over `[-0.99, 0.99]`).
pub const DEFAULT_THETA_STEPS: usize = 199;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> ModelResult<Vec<f64>> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(ModelError::InvalidArgument(format!(
            "invalid grid range: min={min}, max={max} (must be finite and max>min)"
        )));
    }
    if steps < 2 {
        return Err(ModelError::InvalidArgument("grid steps must be >= 2".to_string()));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// θ grid over the invertible region.
pub fn theta_grid(steps: usize) -> ModelResult<Vec<f64>> {
    lin_space(-THETA_BOUND, THETA_BOUND, steps)
}

/// Distance between neighbouring grid points.
pub fn theta_step(steps: usize) -> f64 {
    2.0 * THETA_BOUND / (steps.max(2) as f64 - 1.0)
}
