//! Diebold-Mariano test for equal predictive accuracy.
//!
//! Loss differential under squared error: `d_t = e1_t² − e2_t²`.
//!
//! ```text
//! γ_k  = (1/n) Σ_{t=k}^{n-1} (d_t − d̄)(d_{t−k} − d̄)
//! V(d̄) = (γ_0 + 2 Σ_{k=1}^{h−1} γ_k) / n
//! DM   = d̄ / √V(d̄) · √((n + 1 − 2h + h(h − 1)/n) / n)
//! ```
//!
//! The last factor is the Harvey-Leybourne-Newbold small-sample correction; the
//! p-value is two-sided from Student-t with `n − 1` degrees of freedom. A
//! negative statistic means the first forecast has the smaller loss.

use crate::error::{ModelError, ModelResult};
use crate::stats::two_sided_t_pvalue;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmTest {
    pub statistic: f64,
    pub p_value: f64,
    /// Number of paired errors used after truncation.
    pub n: usize,
    pub mean_differential: f64,
}

/// Compare two forecast-error sequences. Unequal lengths are cut to the shorter.
pub fn diebold_mariano(e1: &[f64], e2: &[f64], horizon: usize) -> ModelResult<DmTest> {
    let n = e1.len().min(e2.len());
    if e1.len() != e2.len() {
        tracing::warn!(
            first = e1.len(),
            second = e2.len(),
            "error sequences differ in length; truncating to the shorter"
        );
    }
    if n < 2 {
        return Err(ModelError::InsufficientData { needed: 2, got: n });
    }
    if horizon == 0 || horizon >= n {
        return Err(ModelError::InvalidArgument(format!(
            "horizon must be in 1..{n}, got {horizon}"
        )));
    }

    let d: Vec<f64> = e1[..n].iter().zip(&e2[..n]).map(|(a, b)| a * a - b * b).collect();
    if d.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite("loss differential".to_string()));
    }

    let nf = n as f64;
    let mean = d.iter().sum::<f64>() / nf;
    let autocov = |k: usize| -> f64 {
        (k..n).map(|t| (d[t] - mean) * (d[t - k] - mean)).sum::<f64>() / nf
    };

    let long_run = autocov(0) + 2.0 * (1..horizon).map(autocov).sum::<f64>();
    let variance = long_run / nf;
    if !(variance.is_finite() && variance > 0.0) {
        return Err(ModelError::DegenerateTest(
            "loss differential has zero or negative variance".to_string(),
        ));
    }

    let h = horizon as f64;
    let correction = ((nf + 1.0 - 2.0 * h + h * (h - 1.0) / nf) / nf).sqrt();
    let statistic = mean / variance.sqrt() * correction;
    let p_value = two_sided_t_pvalue(statistic, n - 1)?;

    Ok(DmTest {
        statistic,
        p_value,
        n,
        mean_differential: mean,
    })
}
