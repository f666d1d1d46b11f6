//! Series transform engine.
//!
//! Responsibilities:
//!
//! - intern region/category codes into dictionaries
//! - partition validated records into `(region, category)` series
//! - derive lagged month-over-month and year-over-year rates per series
//! - null out rates whose magnitude exceeds the outlier threshold

pub mod engine;
pub mod rates;

pub use engine::*;
pub use rates::*;
