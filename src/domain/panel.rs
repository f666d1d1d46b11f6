//! The immutable panel and borrowed views over it.

use chrono::NaiveDate;

use crate::domain::{Dictionary, Label, Observation, SeriesKey};

/// The cleaned, rate-annotated dataset.
///
/// Rows are ordered by `(region code, category code, period)`. Nothing hands
/// out a mutable reference once the panel is built; filtering produces a
/// [`PanelView`] that borrows from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    regions: Dictionary,
    categories: Dictionary,
    observations: Vec<Observation>,
}

impl Panel {
    pub(crate) fn new(regions: Dictionary, categories: Dictionary, observations: Vec<Observation>) -> Self {
        Self {
            regions,
            categories,
            observations,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn regions(&self) -> &Dictionary {
        &self.regions
    }

    pub fn categories(&self) -> &Dictionary {
        &self.categories
    }

    pub fn region_label(&self, obs: &Observation) -> Option<&Label> {
        self.regions.get(obs.region)
    }

    pub fn category_label(&self, obs: &Observation) -> Option<&Label> {
        self.categories.get(obs.category)
    }

    /// The region name this row was recorded under.
    pub fn region_name(&self, obs: &Observation) -> &str {
        self.regions.display(obs.region_name)
    }

    /// The category name this row was recorded under.
    pub fn category_name(&self, obs: &Observation) -> &str {
        self.categories.display(obs.category_name)
    }

    /// Distinct region display names, ascending.
    pub fn region_names(&self) -> Vec<String> {
        self.regions.names()
    }

    /// Distinct category display names, ascending.
    pub fn category_names(&self) -> Vec<String> {
        self.categories.names()
    }

    /// `(min, max)` period, or `None` for an empty panel.
    pub fn period_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.observations.iter().map(|o| o.period).min()?;
        let max = self.observations.iter().map(|o| o.period).max()?;
        Some((min, max))
    }

    /// Distinct periods, ascending.
    pub fn months(&self) -> Vec<NaiveDate> {
        let mut months: Vec<NaiveDate> = self.observations.iter().map(|o| o.period).collect();
        months.sort_unstable();
        months.dedup();
        months
    }

    /// Iterate series as contiguous, period-ordered slices.
    pub fn series(&self) -> impl Iterator<Item = (SeriesKey, &[Observation])> {
        self.observations
            .chunk_by(|a, b| a.key() == b.key())
            .filter_map(|chunk| chunk.first().map(|o| (o.key(), chunk)))
    }

    pub fn series_count(&self) -> usize {
        self.series().count()
    }

    /// A view containing every row.
    pub fn view(&self) -> PanelView<'_> {
        PanelView::new(self, self.observations.iter().collect())
    }
}

/// An observation with its labels resolved.
#[derive(Debug, Clone, Copy)]
pub struct LabeledObservation<'a> {
    pub observation: &'a Observation,
    pub region_name: &'a str,
    pub category_name: &'a str,
}

/// A read-only subset of a [`Panel`], in panel order.
#[derive(Debug, Clone)]
pub struct PanelView<'a> {
    panel: &'a Panel,
    rows: Vec<&'a Observation>,
}

impl<'a> PanelView<'a> {
    pub(crate) fn new(panel: &'a Panel, rows: Vec<&'a Observation>) -> Self {
        Self { panel, rows }
    }

    pub fn panel(&self) -> &'a Panel {
        self.panel
    }

    pub fn rows(&self) -> &[&'a Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labeled(&self) -> impl Iterator<Item = LabeledObservation<'a>> + '_ {
        let panel = self.panel;
        self.rows.iter().map(move |&observation| LabeledObservation {
            observation,
            region_name: panel.region_name(observation),
            category_name: panel.category_name(observation),
        })
    }

    pub fn latest_period(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|o| o.period).max()
    }

    /// Owned copies of the selected rows.
    pub fn to_observations(&self) -> Vec<Observation> {
        self.rows.iter().map(|&&o| o).collect()
    }
}
