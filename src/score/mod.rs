//! Forecast scoring: alignment against holdout actuals and pooled metrics.

pub mod align;
pub mod metrics;

pub use align::*;
pub use metrics::*;
