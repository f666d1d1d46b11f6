//! Filtering a panel by period range and region/category membership.
//!
//! - `apply_filters` returns a borrowed view; the panel itself is never touched
//! - `options` derives what a user can pick and what is preselected

pub mod options;

pub use options::*;

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{Panel, PanelView};

/// What the user selected.
///
/// Empty `regions` / `categories` mean "every region" / "every category".
/// Missing bounds mean "from the first" / "through the last" period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterParams {
    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_regions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Rows whose period lies in `[start, end]` and whose region/category names
/// are selected. An empty result is a valid view, not an error.
pub fn apply_filters<'a>(panel: &'a Panel, params: &FilterParams) -> PanelView<'a> {
    let rows = panel
        .observations()
        .iter()
        .filter(|o| params.start.is_none_or(|s| o.period >= s))
        .filter(|o| params.end.is_none_or(|e| o.period <= e))
        .filter(|o| matches_any(&params.regions, panel.region_name(o)))
        .filter(|o| matches_any(&params.categories, panel.category_name(o)))
        .collect::<Vec<_>>();

    if rows.is_empty() {
        tracing::warn!(?params, "filter selected no observations");
    }

    PanelView::new(panel, rows)
}

fn matches_any(selected: &BTreeSet<String>, name: &str) -> bool {
    selected.is_empty() || selected.contains(name)
}
