//! Build a [`Panel`] from ingested records.

use std::collections::BTreeMap;

use crate::domain::{
    Dictionary, DictionaryBuilder, MOM_LAG, NameId, Observation, Panel, Record, SeriesKey, YOY_LAG,
};
use crate::error::{PanelError, PanelResult};
use crate::transform::rates::lagged_rates;

/// Derive the panel from records sorted by `(region_code, category_code, period)`.
///
/// Partitions are formed by key lookup rather than by adjacency, so the input
/// order across series does not matter. Within a series the periods must be
/// strictly increasing; anything else is an [`PanelError::InvariantViolation`].
pub fn build_panel(records: &[Record]) -> PanelResult<Panel> {
    let (regions, categories) = intern_labels(records);

    let mut partitions: BTreeMap<SeriesKey, Vec<&Record>> = BTreeMap::new();
    for record in records {
        let key = series_key(record, &regions, &categories)?;
        partitions.entry(key).or_default().push(record);
    }

    let mut observations = Vec::with_capacity(records.len());
    for (key, series) in &partitions {
        ensure_chronological(key, series, &regions, &categories)?;

        let values: Vec<f64> = series.iter().map(|r| r.index_value).collect();
        let mom = lagged_rates(&values, MOM_LAG);
        let yoy = lagged_rates(&values, YOY_LAG);

        for (i, record) in series.iter().enumerate() {
            observations.push(Observation {
                region: key.region,
                category: key.category,
                region_name: name_id(&regions, &record.region_name)?,
                category_name: name_id(&categories, &record.category_name)?,
                period: record.period,
                index_value: record.index_value,
                mom_rate: mom[i],
                yoy_rate: yoy[i],
            });
        }
    }

    tracing::debug!(
        series = partitions.len(),
        observations = observations.len(),
        "built panel"
    );

    Ok(Panel::new(regions, categories, observations))
}

fn intern_labels(records: &[Record]) -> (Dictionary, Dictionary) {
    let mut regions = DictionaryBuilder::new();
    let mut categories = DictionaryBuilder::new();
    for r in records {
        regions.insert(&r.region_code, &r.region_name);
        categories.insert(&r.category_code, &r.category_name);
    }
    (regions.build(), categories.build())
}

fn series_key(record: &Record, regions: &Dictionary, categories: &Dictionary) -> PanelResult<SeriesKey> {
    let region = regions.lookup(&record.region_code).ok_or_else(|| {
        PanelError::InvariantViolation(format!("region '{}' was not interned", record.region_code))
    })?;
    let category = categories.lookup(&record.category_code).ok_or_else(|| {
        PanelError::InvariantViolation(format!("category '{}' was not interned", record.category_code))
    })?;
    Ok(SeriesKey { region, category })
}

fn name_id(dictionary: &Dictionary, name: &str) -> PanelResult<NameId> {
    dictionary
        .name_id(name)
        .ok_or_else(|| PanelError::InvariantViolation(format!("name '{name}' was not interned")))
}

fn ensure_chronological(
    key: &SeriesKey,
    series: &[&Record],
    regions: &Dictionary,
    categories: &Dictionary,
) -> PanelResult<()> {
    for pair in series.windows(2) {
        if pair[1].period <= pair[0].period {
            return Err(PanelError::InvariantViolation(format!(
                "series ({}, {}) is not strictly ordered by period: {} follows {}",
                regions.get(key.region).map(|l| l.code.as_str()).unwrap_or("?"),
                categories.get(key.category).map(|l| l.code.as_str()).unwrap_or("?"),
                pair[1].period,
                pair[0].period,
            )));
        }
    }
    Ok(())
}
