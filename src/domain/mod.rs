//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model families and sample windows (`ModelFamily`, `SampleWindow`)
//! - per-stage outputs (`Forecast`, `ErrorRecord`, `MetricSummary`, ...)
//! - the resolved run configuration (`ReportConfig`)

pub mod types;

pub use types::*;
