//! JSON report export.
//!
//! The JSON report is the machine-readable twin of the terminal output: pooled
//! metrics, selections, significance tests, per-window forecasts and the
//! inflation screening stage, stamped with the generation time. serde_json
//! writes non-finite numbers as `null`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Forecast, MetricSummary, PredictorScreen, SampleWindow, YearRange};
use crate::error::AppError;
use crate::report::ModelComparison;
use crate::screening::InflationOutlook;

#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub horizon: usize,
    pub windows: Vec<SampleWindow>,
    pub metrics: Vec<MetricSummary>,
    pub comparisons: Vec<ModelComparison>,
    pub forecasts: Vec<Forecast>,
    pub inflation: Option<InflationSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InflationSection {
    pub target: String,
    pub window: YearRange,
    pub screens: Vec<PredictorScreen>,
    pub model_variables: Vec<String>,
    pub forecast_year: i32,
    pub forecast: f64,
}

impl From<&InflationOutlook> for InflationSection {
    fn from(o: &InflationOutlook) -> Self {
        Self {
            target: o.target.clone(),
            window: o.window,
            screens: o.screens.clone(),
            model_variables: o.model_variables.clone(),
            forecast_year: o.forecast_year,
            forecast: o.forecast,
        }
    }
}

/// Write a JSON report file.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    write_report(file, report)?;
    tracing::info!(path = %path.display(), "report exported");
    Ok(())
}

/// Same as [`write_report_json`] over any writer.
pub fn write_report<W: Write>(writer: W, report: &ReportFile) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))
}
