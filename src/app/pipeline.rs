//! Shared "load" logic used by every command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! raw bytes -> ingest/validate -> build panel -> filter
//!
//! The commands can then focus on presentation (tables vs CSV vs JSON).

use std::io::Read;

use serde::Serialize;

use crate::domain::{Panel, PanelView};
use crate::error::PanelResult;
use crate::filter::{FilterParams, apply_filters};
use crate::io::ingest::{IngestedData, RowError, read_records};
use crate::transform::build_panel;

/// Counts describing how a source turned into a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub duplicates: usize,
}

impl From<&IngestedData> for IngestSummary {
    fn from(data: &IngestedData) -> Self {
        Self {
            rows_read: data.rows_read,
            rows_used: data.rows_used,
            rows_dropped: data.row_errors.len(),
            duplicates: data.duplicates,
        }
    }
}

/// A built panel plus what happened during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPanel {
    pub panel: Panel,
    pub summary: IngestSummary,
    pub row_errors: Vec<RowError>,
}

impl LoadedPanel {
    pub fn filter(&self, params: &FilterParams) -> PanelView<'_> {
        apply_filters(&self.panel, params)
    }
}

/// Ingest `reader` and derive the panel.
pub fn load_panel<R: Read>(reader: R) -> PanelResult<LoadedPanel> {
    let ingest = read_records(reader)?;
    let panel = build_panel(&ingest.records)?;
    Ok(LoadedPanel {
        summary: IngestSummary::from(&ingest),
        row_errors: ingest.row_errors,
        panel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_panel_reports_counts() {
        let csv = "[Year],[Month],[geo],[GeoName],[COICOP],[COICOP_Name],[Value]\n\
                   2020,1,FR,France,CP00,All,100\n\
                   2020,x,FR,France,CP00,All,100\n\
                   2020,2,FR,France,CP00,All,101\n";
        let loaded = load_panel(csv.as_bytes()).unwrap();
        assert_eq!(
            loaded.summary,
            IngestSummary {
                rows_read: 3,
                rows_used: 2,
                rows_dropped: 1,
                duplicates: 0,
            }
        );
        assert_eq!(loaded.panel.len(), 2);
        assert!((loaded.panel.observations()[1].mom_rate.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn schema_failure_propagates() {
        let csv = "[Year],[Month]\n2020,1\n";
        assert!(load_panel(csv.as_bytes()).is_err());
    }
}
