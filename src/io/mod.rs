//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - metrics CSV export (`export`)
//! - JSON report export (`report_json`)

pub mod export;
pub mod ingest;
pub mod report_json;

pub use export::*;
pub use ingest::*;
pub use report_json::*;
