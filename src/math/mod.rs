//! Mathematical utilities: least squares and one-dimensional search.

pub mod ols;
pub mod search;

pub use ols::*;
pub use search::*;
