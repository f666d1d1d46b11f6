//! Export the filtered observations as CSV.
//!
//! The export is meant to be easy to consume in spreadsheets: human-readable
//! headers, ISO dates, empty cells for missing rates.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::PanelView;
use crate::error::AppError;

pub const TABLE_HEADERS: [&str; 6] = [
    "Date",
    "Country/Regions",
    "Categories",
    "Index",
    "Monthly rate",
    "Annual rate",
];

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow<'a> {
    pub date: String,
    pub region: &'a str,
    pub category: &'a str,
    pub index: f64,
    pub monthly_rate: Option<f64>,
    pub annual_rate: Option<f64>,
}

/// Rows of `view` ordered by date, then region, then category.
pub fn table_rows<'a>(view: &PanelView<'a>) -> Vec<TableRow<'a>> {
    let mut labeled: Vec<_> = view.labeled().collect();
    labeled.sort_by(|a, b| {
        (a.observation.period, a.region_name, a.category_name).cmp(&(
            b.observation.period,
            b.region_name,
            b.category_name,
        ))
    });

    labeled
        .into_iter()
        .map(|row| TableRow {
            date: row.observation.period.format("%Y-%m-%d").to_string(),
            region: row.region_name,
            category: row.category_name,
            index: row.observation.index_value,
            monthly_rate: row.observation.mom_rate,
            annual_rate: row.observation.yoy_rate,
        })
        .collect()
}

/// Write the table to any writer. The header is written even when `view` is empty.
pub fn write_table_csv<W: Write>(writer: W, view: &PanelView<'_>) -> Result<(), AppError> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    out.write_record(TABLE_HEADERS)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in table_rows(view) {
        out.serialize(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// The table as an in-memory UTF-8 payload, ready to hand out as a download.
pub fn table_csv_bytes(view: &PanelView<'_>) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    write_table_csv(&mut buf, view)?;
    Ok(buf)
}

/// Write the table to `path`.
pub fn write_table_csv_file(path: &Path, view: &PanelView<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_table_csv(file, view)
}
