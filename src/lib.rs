//! `macro-forecast` library crate.
//!
//! The binary (`macro-forecast`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the pipeline stages (fit, forecast, score, compare) are reusable on their own

pub mod app;
pub mod backtest;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod score;
pub mod screening;
pub mod stats;
