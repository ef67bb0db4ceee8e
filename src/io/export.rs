//! Export pooled metrics to CSV.
//!
//! One row per (variable, family), meant for spreadsheets or downstream scripts.
//! Non-finite metrics are written as `inf`/`NaN`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::MetricSummary;
use crate::error::AppError;
use crate::report::ModelComparison;

const HEADER: [&str; 10] = [
    "variable", "model", "n", "mse", "rmse", "mae", "mspe", "rmspe", "mape", "rank",
];

/// Write the metrics table to a CSV file.
pub fn write_metrics_csv(
    path: &Path,
    summaries: &[MetricSummary],
    comparisons: &[ModelComparison],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create metrics CSV '{}': {e}", path.display())))?;
    write_metrics(file, summaries, comparisons)?;
    tracing::info!(path = %path.display(), rows = summaries.len(), "metrics exported");
    Ok(())
}

/// Same as [`write_metrics_csv`] over any writer.
pub fn write_metrics<W: Write>(
    writer: W,
    summaries: &[MetricSummary],
    comparisons: &[ModelComparison],
) -> Result<(), AppError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write metrics CSV header: {e}")))?;

    for s in summaries {
        let rank = comparisons
            .iter()
            .find(|c| c.selection.variable == s.variable)
            .map(|c| {
                if c.selection.best == s.family {
                    "1"
                } else if c.selection.second == s.family {
                    "2"
                } else {
                    ""
                }
            })
            .unwrap_or("");
        let m = &s.metrics;
        csv.write_record([
            s.variable.clone(),
            s.family.code().to_string(),
            m.n.to_string(),
            m.mse.to_string(),
            m.rmse.to_string(),
            m.mae.to_string(),
            m.mspe.to_string(),
            m.rmspe.to_string(),
            m.mape.to_string(),
            rank.to_string(),
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write metrics CSV row: {e}")))?;
    }

    csv.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush metrics CSV: {e}")))?;
    Ok(())
}
