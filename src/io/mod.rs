//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - filtered table export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
