//! `hicp-panel` library crate.
//!
//! Turns a harmonised price-index export into an immutable panel of monthly
//! series with month-over-month and year-over-year rates, and exposes the
//! read-only projections a dashboard needs (filters, KPIs, latest snapshots,
//! CSV export).
//!
//! The binary (`hicp`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - a different front-end can reuse the same panel and cache

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod report;
pub mod transform;

pub use app::pipeline::{IngestSummary, LoadedPanel, load_panel};
pub use cache::PanelCache;
pub use domain::{Observation, Panel, PanelView};
pub use error::{AppError, PanelError};
pub use filter::{FilterParams, apply_filters};
pub use transform::build_panel;
