//! Reporting utilities: headline KPIs, latest snapshots, per-series summary.
//!
//! Everything here is a read-only projection of a [`PanelView`]. Formatting
//! for the terminal lives in [`format`].

pub mod format;

pub use format::*;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{Observation, PanelView};

/// Headline numbers for a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub latest_month: NaiveDate,
    /// Mean annual rate across observations at `latest_month`, nulls skipped.
    pub avg_annual_rate: Option<f64>,
    /// Mean monthly rate across observations at `latest_month`, nulls skipped.
    pub avg_monthly_rate: Option<f64>,
    /// Observations at `latest_month`.
    pub n_latest: usize,
}

/// Latest observation of one (region, category) pair in a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRow {
    pub region: String,
    pub category: String,
    pub period: NaiveDate,
    pub index_value: f64,
    pub monthly_rate: Option<f64>,
    pub annual_rate: Option<f64>,
}

/// Row ordering for [`latest_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Order by region, then category.
    Region,
    /// Order by category, then region.
    Category,
}

/// Compute KPIs, or `None` for an empty view.
pub fn compute_kpis(view: &PanelView<'_>) -> Option<Kpis> {
    let latest_month = view.latest_period()?;
    let latest: Vec<&Observation> = view
        .rows()
        .iter()
        .copied()
        .filter(|o| o.period == latest_month)
        .collect();

    Some(Kpis {
        latest_month,
        avg_annual_rate: mean(latest.iter().filter_map(|o| o.yoy_rate)),
        avg_monthly_rate: mean(latest.iter().filter_map(|o| o.mom_rate)),
        n_latest: latest.len(),
    })
}

/// The most recent observation for each (region name, category name) pair.
pub fn latest_snapshot(view: &PanelView<'_>, group_by: GroupBy) -> Vec<LatestRow> {
    let mut latest: BTreeMap<(&str, &str), &Observation> = BTreeMap::new();
    for row in view.labeled() {
        let slot = latest
            .entry((row.region_name, row.category_name))
            .or_insert(row.observation);
        if row.observation.period > slot.period {
            *slot = row.observation;
        }
    }

    let mut rows: Vec<LatestRow> = latest
        .into_iter()
        .map(|((region, category), o)| LatestRow {
            region: region.to_string(),
            category: category.to_string(),
            period: o.period,
            index_value: o.index_value,
            monthly_rate: o.mom_rate,
            annual_rate: o.yoy_rate,
        })
        .collect();

    if group_by == GroupBy::Category {
        rows.sort_by(|a, b| (&a.category, &a.region).cmp(&(&b.category, &b.region)));
    }
    rows
}

/// Latest monthly/annual rate per series, ordered by region then category.
pub fn series_summary(view: &PanelView<'_>) -> Vec<LatestRow> {
    latest_snapshot(view, GroupBy::Region)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
