//! In-memory panel data.

pub mod table;

pub use table::*;
