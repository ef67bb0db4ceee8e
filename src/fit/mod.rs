//! Model fitting and selection.
//!
//! Responsibilities:
//!
//! - estimate AR(1), MA(1), ARMA(1,1) per series and VAR(1) jointly
//! - search the MA coefficient over a θ grid (parallel)
//! - pick the two best families per variable by pooled RMSE

pub mod fitter;
pub mod selection;
pub mod theta_grid;

pub use fitter::*;
pub use selection::*;
pub use theta_grid::*;
