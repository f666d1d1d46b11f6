//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the logical input fields and their source aliases (`LogicalField`)
//! - validated source rows (`Record`) and derived panel rows (`Observation`)
//! - interned region/category labels (`Dictionary`)
//! - the immutable `Panel` and filtered `PanelView`

pub mod dictionary;
pub mod panel;
pub mod types;

pub use dictionary::*;
pub use panel::*;
pub use types::*;
