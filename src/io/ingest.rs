//! CSV ingest and validation.
//!
//! This module is responsible for turning a loosely-typed price-index export
//! into a sorted list of validated [`Record`]s that the transform engine can
//! consume without re-checking anything.
//!
//! Design goals:
//! - **Strict schema**: every logical field must map to some header, otherwise
//!   the whole load fails before any row is read
//! - **Lenient rows**: a row that fails coercion is dropped and noted, never fatal
//! - **Deterministic output**: stable sort, first-seen duplicate resolution

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{LogicalField, Record, month_start};
use crate::error::{PanelError, PanelResult};

/// A row that was left out of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the source (header is line 1).
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated records + what happened to the rest.
#[derive(Debug, Clone)]
pub struct IngestedData {
    /// Sorted by `(region_code, category_code, period)`, one row per period.
    pub records: Vec<Record>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Rows dropped because their series already had that period.
    pub duplicates: usize,
}

/// Resolved column positions for each logical field.
#[derive(Debug, Clone)]
struct ColumnMap {
    year: usize,
    month: usize,
    region_code: usize,
    region_name: usize,
    category_code: usize,
    category_name: usize,
    index_value: usize,
}

/// Open `path` and ingest it.
pub fn load_records(path: &Path) -> PanelResult<IngestedData> {
    let file = File::open(path).map_err(|source| PanelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file)
}

/// Ingest delimited text from any reader.
pub fn read_records<R: Read>(reader: R) -> PanelResult<IngestedData> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PanelError::EmptyHeader);
    }
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                tracing::debug!(line, error = %e, "skipping untokenizable row");
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok(r) => records.push(r),
            Err(message) => {
                tracing::debug!(line, %message, "dropping row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    records.sort_by(|a, b| {
        (&a.region_code, &a.category_code, a.period).cmp(&(&b.region_code, &b.category_code, b.period))
    });
    let before = records.len();
    // Sort is stable, so the first-seen row of each period survives.
    records.dedup_by(|later, earlier| {
        later.region_code == earlier.region_code
            && later.category_code == earlier.category_code
            && later.period == earlier.period
    });
    let duplicates = before - records.len();
    if duplicates > 0 {
        tracing::warn!(duplicates, "dropped rows repeating a period within their series");
    }

    let rows_used = records.len();
    tracing::info!(
        rows_read,
        rows_used,
        rows_dropped = row_errors.len(),
        duplicates,
        "ingested price-index rows"
    );

    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
        rows_used,
        duplicates,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will report a
    // missing `year` column.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

fn resolve_columns(headers: &StringRecord) -> PanelResult<ColumnMap> {
    let header_map = build_header_map(headers);

    let mut found: HashMap<LogicalField, usize> = HashMap::new();
    let mut missing = Vec::new();
    for field in LogicalField::ALL {
        match field.aliases().iter().find_map(|alias| header_map.get(*alias)) {
            Some(&idx) => {
                found.insert(field, idx);
            }
            None => missing.push(field.name().to_string()),
        }
    }

    if !missing.is_empty() {
        missing.sort();
        return Err(PanelError::Schema { missing });
    }

    let col = |field: LogicalField| found.get(&field).copied().unwrap_or_default();
    Ok(ColumnMap {
        year: col(LogicalField::Year),
        month: col(LogicalField::Month),
        region_code: col(LogicalField::RegionCode),
        region_name: col(LogicalField::RegionName),
        category_code: col(LogicalField::CategoryCode),
        category_name: col(LogicalField::CategoryName),
        index_value: col(LogicalField::IndexValue),
    })
}

fn parse_row(record: &StringRecord, columns: &ColumnMap) -> Result<Record, String> {
    let year = parse_int(get_field(record, columns.year))
        .ok_or_else(|| "Missing/invalid `year` value.".to_string())?;
    let month = parse_int(get_field(record, columns.month))
        .ok_or_else(|| "Missing/invalid `month` value.".to_string())?;
    let index_value = parse_f64(get_field(record, columns.index_value))
        .ok_or_else(|| "Missing/invalid `index_value` value.".to_string())?;

    let period = i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .and_then(|(y, m)| month_start(y, m))
        .ok_or_else(|| format!("Invalid calendar month {year}-{month}."))?;

    Ok(Record {
        region_code: get_field(record, columns.region_code).to_string(),
        region_name: get_field(record, columns.region_name).to_string(),
        category_code: get_field(record, columns.category_code).to_string(),
        category_name: get_field(record, columns.category_name).to_string(),
        period,
        index_value,
    })
}

fn get_field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Integers may arrive as `2020` or `2020.0`; anything with a fraction is invalid.
fn parse_int(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn parse_f64(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = "[Year],[Month],[geo],[GeoName],[COICOP],[COICOP_Name],[Value]";

    fn ingest(body: &str) -> PanelResult<IngestedData> {
        read_records(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn aliased_header_maps_all_fields() {
        let data = ingest("2020,1,FR,France,CP00,All-items HICP,104.5\n").unwrap();
        assert_eq!(data.records.len(), 1);
        let r = &data.records[0];
        assert_eq!(r.region_code, "FR");
        assert_eq!(r.region_name, "France");
        assert_eq!(r.category_code, "CP00");
        assert_eq!(r.category_name, "All-items HICP");
        assert_eq!(r.period, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!((r.index_value - 104.5).abs() < 1e-12);
    }

    #[test]
    fn missing_value_column_is_a_schema_error() {
        let csv = "[Year],[Month],[geo],[GeoName],[COICOP],[COICOP_Name]\n2020,1,FR,France,CP00,All,\n";
        match read_records(csv.as_bytes()) {
            Err(PanelError::Schema { missing }) => assert_eq!(missing, vec!["index_value".to_string()]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn schema_error_lists_every_missing_field() {
        let csv = "[Year],[geo],[Value]\n2020,FR,1\n";
        match read_records(csv.as_bytes()) {
            Err(PanelError::Schema { missing }) => {
                assert_eq!(
                    missing,
                    vec!["category_code", "category_name", "month", "region_name"]
                );
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(read_records("".as_bytes()), Err(PanelError::EmptyHeader)));
    }

    #[test]
    fn bom_and_case_are_ignored_in_headers() {
        let csv = "\u{feff}YEAR,Month,Geo,geo_name,coicop,COICOP_NAME,Index\n2021,5,DE,Germany,CP00,All,99\n";
        let data = read_records(csv.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 1);
    }

    #[test]
    fn bad_months_are_dropped_not_fatal() {
        let mut body = String::new();
        for i in 0..100 {
            let month = if i % 40 == 0 { "x".to_string() } else { ((i % 12) + 1).to_string() };
            let year = 2000 + i / 12;
            body.push_str(&format!("{year},{month},FR,France,CP00,All,{}\n", 100 + i));
        }
        let data = ingest(&body).unwrap();
        assert_eq!(data.rows_read, 100);
        assert_eq!(data.rows_used, 97);
        assert_eq!(data.row_errors.len(), 3);
        assert!(data.row_errors.iter().all(|e| e.message.contains("month")));
    }

    #[test]
    fn invalid_calendar_month_and_blank_index_are_dropped() {
        let data = ingest(
            "2020,13,FR,France,CP00,All,100\n\
             2020,0,FR,France,CP00,All,100\n\
             2020,2,FR,France,CP00,All,\n\
             2020,3,FR,France,CP00,All,n/a\n\
             2020.0,4.0,FR,France,CP00,All,101\n",
        )
        .unwrap();
        assert_eq!(data.rows_used, 1);
        assert_eq!(data.records[0].period, NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
        assert_eq!(data.row_errors[0].line, 2);
    }

    #[test]
    fn untokenizable_rows_are_skipped() {
        let data = ingest(
            "2020,1,FR,France,CP00,All,100\n\
             2020,2,FR,France,CP00,All,100,extra\n\
             2020,3,FR,France,CP00,All,102\n",
        )
        .unwrap();
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.rows_used, 2);
        assert!(data.row_errors[0].message.contains("CSV parse error"));
    }

    #[test]
    fn output_is_sorted_by_series_then_period() {
        let data = ingest(
            "2020,2,FR,France,CP00,All,101\n\
             2020,1,DE,Germany,CP00,All,100\n\
             2020,1,FR,France,CP00,All,100\n\
             2019,12,FR,France,CP00,All,99\n",
        )
        .unwrap();
        let keys: Vec<(String, NaiveDate)> = data
            .records
            .iter()
            .map(|r| (r.region_code.clone(), r.period))
            .collect();
        assert_eq!(keys[0].0, "DE");
        assert_eq!(keys[1], ("FR".to_string(), NaiveDate::from_ymd_opt(2019, 12, 1).unwrap()));
        assert_eq!(keys[3], ("FR".to_string(), NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()));
    }

    #[test]
    fn duplicate_periods_keep_first_seen() {
        let data = ingest(
            "2020,1,FR,France,CP00,All,100\n\
             2020,1,FR,France,CP00,All,555\n",
        )
        .unwrap();
        assert_eq!(data.duplicates, 1);
        assert_eq!(data.records.len(), 1);
        assert!((data.records[0].index_value - 100.0).abs() < 1e-12);
    }

    #[test]
    fn parse_int_accepts_integral_floats_only() {
        assert_eq!(parse_int("2020"), Some(2020));
        assert_eq!(parse_int("7.0"), Some(7));
        assert_eq!(parse_int("7.5"), None);
        assert_eq!(parse_int(""), None);
    }
}
