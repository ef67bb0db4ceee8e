//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - passed between pipeline stages (fit -> forecast -> score -> aggregate)
//! - exported to CSV/JSON
//! - rendered by the report and plot modules

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Target variables of the main panel, in report order.
pub const MAIN_VARIABLES: [&str; 3] = ["gdp", "inf", "une"];

/// Candidate inflation predictors of the auxiliary panel, in screening order.
pub const AUX_PREDICTORS: [&str; 4] = ["int", "mos", "oil", "exr"];

/// Forecast horizon used by the robustness windows.
pub const DEFAULT_HORIZON: usize = 3;

/// Predictors with a p-value strictly below this are retained (90% confidence).
pub const DEFAULT_SCREEN_ALPHA: f64 = 0.10;

/// Model family. Enumeration order is also the selector's tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum ModelFamily {
    Ar1,
    Ma1,
    Arma1,
    Var1,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 4] = [
        ModelFamily::Ar1,
        ModelFamily::Ma1,
        ModelFamily::Arma1,
        ModelFamily::Var1,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelFamily::Ar1 => "AR(1)",
            ModelFamily::Ma1 => "MA(1)",
            ModelFamily::Arma1 => "ARMA(1,1)",
            ModelFamily::Var1 => "VAR(1)",
        }
    }

    /// Short label used in exports.
    pub fn code(self) -> &'static str {
        match self {
            ModelFamily::Ar1 => "AR1",
            ModelFamily::Ma1 => "MA1",
            ModelFamily::Arma1 => "ARMA1",
            ModelFamily::Var1 => "VAR1",
        }
    }

    /// Parameter count, used as the minimum number of in-sample observations.
    ///
    /// Univariate families count their coefficients plus the innovation variance.
    /// VAR(1) over `n_series` series needs `n_series + 1` regressors per equation
    /// and loses one observation to the lag.
    pub fn param_count(self, n_series: usize) -> usize {
        match self {
            ModelFamily::Ar1 => 3,
            ModelFamily::Ma1 => 3,
            ModelFamily::Arma1 => 4,
            ModelFamily::Var1 => n_series + 2,
        }
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A training range plus the adjacent holdout range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWindow {
    pub label: String,
    pub in_sample: YearRange,
    pub holdout: YearRange,
}

impl SampleWindow {
    /// Build a window. Returns `None` unless the holdout starts the year after
    /// the in-sample range ends and both ranges are non-empty.
    pub fn new(label: impl Into<String>, in_sample: YearRange, holdout: YearRange) -> Option<Self> {
        if in_sample.is_empty() || holdout.is_empty() || holdout.start != in_sample.end + 1 {
            return None;
        }
        Some(Self {
            label: label.into(),
            in_sample,
            holdout,
        })
    }

    /// The three overlapping robustness windows.
    pub fn robustness_defaults() -> Vec<SampleWindow> {
        vec![
            SampleWindow {
                label: "A".to_string(),
                in_sample: YearRange::new(1998, 2015),
                holdout: YearRange::new(2016, 2022),
            },
            SampleWindow {
                label: "B".to_string(),
                in_sample: YearRange::new(1999, 2016),
                holdout: YearRange::new(2017, 2021),
            },
            SampleWindow {
                label: "C".to_string(),
                in_sample: YearRange::new(2000, 2017),
                holdout: YearRange::new(2018, 2022),
            },
        ]
    }
}

/// Step-ahead point forecasts for one variable from one fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub family: ModelFamily,
    pub variable: String,
    pub window: String,
    /// Year of the first step (the year after the in-sample end).
    pub first_year: i32,
    pub values: Vec<f64>,
}

impl Forecast {
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.values.len()).map(move |i| self.first_year + i as i32)
    }
}

/// Raw and percent forecast errors for one (family, variable, window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub family: ModelFamily,
    pub variable: String,
    pub window: String,
    pub years: Vec<i32>,
    pub errors: Vec<f64>,
    pub percent_errors: Vec<f64>,
    /// Set when the forecast was longer than the holdout and had to be cut.
    pub forecast_truncated: bool,
}

impl ErrorRecord {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Six error metrics over one pooled sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    pub n: usize,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub mspe: f64,
    pub rmspe: f64,
    pub mape: f64,
}

/// Pooled metrics for one (family, variable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub family: ModelFamily,
    pub variable: String,
    pub metrics: ErrorMetrics,
}

/// The two lowest-RMSE families for a variable, ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestModels {
    pub variable: String,
    pub best: ModelFamily,
    pub second: ModelFamily,
    pub best_rmse: f64,
    pub second_rmse: f64,
}

/// Diebold-Mariano comparison of the two selected families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub variable: String,
    pub best: ModelFamily,
    pub second: ModelFamily,
    pub statistic: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Univariate screening result for one inflation predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorScreen {
    pub predictor: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_stat: f64,
    pub p_value: f64,
    pub retained: bool,
}

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub data_dir: PathBuf,
    pub main_file: String,
    pub aux_file: String,

    pub variables: Vec<String>,
    pub families: Vec<ModelFamily>,
    pub windows: Vec<SampleWindow>,
    pub horizon: usize,
    /// Horizon passed to the Diebold-Mariano variance correction.
    pub dm_horizon: usize,

    pub screen_target: String,
    pub predictors: Vec<String>,
    pub screen_window: YearRange,
    pub screen_alpha: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_metrics: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl ReportConfig {
    pub fn main_path(&self) -> PathBuf {
        self.data_dir.join(&self.main_file)
    }

    pub fn aux_path(&self) -> PathBuf {
        self.data_dir.join(&self.aux_file)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            main_file: "main_data.csv".to_string(),
            aux_file: "additional_data.csv".to_string(),
            variables: MAIN_VARIABLES.iter().map(|s| s.to_string()).collect(),
            families: ModelFamily::ALL.to_vec(),
            windows: SampleWindow::robustness_defaults(),
            horizon: DEFAULT_HORIZON,
            dm_horizon: 1,
            screen_target: "inf".to_string(),
            predictors: AUX_PREDICTORS.iter().map(|s| s.to_string()).collect(),
            screen_window: YearRange::new(2016, 2022),
            screen_alpha: DEFAULT_SCREEN_ALPHA,
            plot: true,
            plot_width: 72,
            plot_height: 16,
            export_metrics: None,
            export_json: None,
        }
    }
}
