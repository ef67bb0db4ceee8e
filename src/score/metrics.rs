//! Pooled error metrics.
//!
//! Records from every window are concatenated first and aggregated once, so a
//! window with more errors carries proportionally more weight than one with
//! fewer. This is not the same as averaging per-window metrics.

use crate::domain::{ErrorMetrics, ErrorRecord, MetricSummary, ModelFamily};
use crate::error::{ModelError, ModelResult};

/// MSE, RMSE, MAE over `errors` and MSPE, RMSPE, MAPE over `percent_errors`.
pub fn aggregate(errors: &[f64], percent_errors: &[f64]) -> ModelResult<ErrorMetrics> {
    if errors.is_empty() {
        return Err(ModelError::InsufficientData { needed: 1, got: 0 });
    }
    if errors.len() != percent_errors.len() {
        return Err(ModelError::InvalidArgument(format!(
            "{} errors but {} percent errors",
            errors.len(),
            percent_errors.len()
        )));
    }

    let mse = mean(errors.iter().map(|e| e * e));
    let mae = mean(errors.iter().map(|e| e.abs()));
    let mspe = mean(percent_errors.iter().map(|p| p * p));
    let mape = mean(percent_errors.iter().map(|p| p.abs()));

    Ok(ErrorMetrics {
        n: errors.len(),
        mse,
        rmse: mse.sqrt(),
        mae,
        mspe,
        rmspe: mspe.sqrt(),
        mape,
    })
}

/// Concatenate the raw and percent errors of `records`, in iteration order.
pub fn pool<'a>(records: impl IntoIterator<Item = &'a ErrorRecord>) -> (Vec<f64>, Vec<f64>) {
    let mut errors = Vec::new();
    let mut percent = Vec::new();
    for r in records {
        errors.extend_from_slice(&r.errors);
        percent.extend_from_slice(&r.percent_errors);
    }
    (errors, percent)
}

/// Pooled raw errors of one (family, variable) across all windows.
pub fn pooled_errors(records: &[ErrorRecord], family: ModelFamily, variable: &str) -> Vec<f64> {
    pool(records.iter().filter(|r| r.family == family && r.variable == variable)).0
}

/// One pooled summary per (variable, family), variables outermost.
pub fn summarize(
    records: &[ErrorRecord],
    variables: &[String],
    families: &[ModelFamily],
) -> ModelResult<Vec<MetricSummary>> {
    let mut out = Vec::with_capacity(variables.len() * families.len());
    for variable in variables {
        for &family in families {
            let (errors, percent) =
                pool(records.iter().filter(|r| r.family == family && &r.variable == variable));
            let metrics = aggregate(&errors, &percent)?;
            out.push(MetricSummary {
                family,
                variable: variable.clone(),
                metrics,
            });
        }
    }
    Ok(out)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(window: &str, errors: Vec<f64>) -> ErrorRecord {
        let percent = errors.iter().map(|e| e / 10.0).collect();
        ErrorRecord {
            family: ModelFamily::Ar1,
            variable: "gdp".to_string(),
            window: window.to_string(),
            years: (0..errors.len() as i32).collect(),
            errors,
            percent_errors: percent,
            forecast_truncated: false,
        }
    }

    #[test]
    fn metrics_match_definitions() {
        let m = aggregate(&[1.0, -2.0, 3.0], &[0.1, -0.2, 0.3]).unwrap();
        assert_eq!(m.n, 3);
        assert_abs_diff_eq!(m.mse, 14.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.rmse, (14.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(m.mae, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.mspe, 0.14 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.rmspe, (0.14_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(m.mape, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn pooled_mse_differs_from_mean_of_window_mses() {
        let records = vec![
            record("A", vec![1.0, 1.0, 1.0]),
            record("B", vec![4.0]),
            record("C", vec![2.0, 2.0]),
        ];
        let (errors, percent) = pool(&records);
        assert_eq!(errors.len(), 6);
        let pooled = aggregate(&errors, &percent).unwrap();

        let naive: f64 = records
            .iter()
            .map(|r| aggregate(&r.errors, &r.percent_errors).unwrap().mse)
            .sum::<f64>()
            / 3.0;

        // pooled = (3 + 16 + 8) / 6 = 4.5; naive = (1 + 16 + 4) / 3 = 7
        assert_abs_diff_eq!(pooled.mse, 4.5, epsilon = 1e-12);
        assert_abs_diff_eq!(naive, 7.0, epsilon = 1e-12);
        assert!((pooled.mse - naive).abs() > 1.0);
    }

    #[test]
    fn infinite_percent_error_propagates() {
        let m = aggregate(&[1.0, 1.0], &[f64::NEG_INFINITY, 0.1]).unwrap();
        assert!(m.mspe.is_infinite());
        assert!(m.mape.is_infinite());
        assert!(m.rmse.is_finite());
    }

    #[test]
    fn empty_pool_is_an_error() {
        assert!(aggregate(&[], &[]).is_err());
        assert!(summarize(&[], &["gdp".to_string()], &[ModelFamily::Ar1]).is_err());
    }
}
