//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the panel/transform code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::IngestSummary;
use crate::domain::{Panel, format_month};
use crate::filter::SelectionOptions;
use crate::io::export::TableRow;
use crate::report::{Kpis, LatestRow};

/// Dataset overview: ingest counts, series count, period range.
pub fn format_overview(source: &str, panel: &Panel, summary: &IngestSummary) -> String {
    let mut out = String::new();

    out.push_str("=== hicp - Harmonised price index panel ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} | used={} | dropped={} | duplicates={}\n",
        summary.rows_read, summary.rows_used, summary.rows_dropped, summary.duplicates
    ));
    out.push_str(&format!(
        "Series: {} | regions={} | categories={}\n",
        panel.series_count(),
        panel.regions().len(),
        panel.categories().len()
    ));
    match panel.period_range() {
        Some((min, max)) => {
            out.push_str(&format!("Periods: {} .. {}\n", format_month(min), format_month(max)))
        }
        None => out.push_str("Periods: (none)\n"),
    }

    out
}

/// Headline KPIs for the selection.
pub fn format_kpis(kpis: &Kpis) -> String {
    let mut out = String::new();
    out.push_str(&format!("Latest month: {}\n", format_month(kpis.latest_month)));
    out.push_str(&format!(
        "Avg Annual inflation rate (selection): {}\n",
        fmt_pct(kpis.avg_annual_rate)
    ));
    out.push_str(&format!(
        "Avg Monthly inflation rate (selection): {}\n",
        fmt_pct(kpis.avg_monthly_rate)
    ));
    out
}

/// The filtered table (same columns as the CSV export).
pub fn format_table(rows: &[TableRow<'_>]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<10} {:<28} {:<32} {:>10} {:>12} {:>12}",
            "Date", "Country/Regions", "Categories", "Index", "Monthly rate", "Annual rate"
        ),
    );
    push_line(
        &mut out,
        format!("{:-<10} {:-<28} {:-<32} {:-<10} {:-<12} {:-<12}", "", "", "", "", "", ""),
    );

    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<10} {:<28} {:<32} {:>10.2} {:>12} {:>12}",
                r.date,
                truncate(r.region, 28),
                truncate(r.category, 32),
                r.index,
                fmt_rate(r.monthly_rate),
                fmt_rate(r.annual_rate),
            ),
        );
    }

    out
}

/// Latest annual/monthly rate per (region, category).
pub fn format_latest(rows: &[LatestRow]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<28} {:<32} {:<8} {:>12} {:>12}",
            "Country/Regions", "Categories", "Month", "Monthly (%)", "Annual (%)"
        ),
    );
    push_line(
        &mut out,
        format!("{:-<28} {:-<32} {:-<8} {:-<12} {:-<12}", "", "", "", "", ""),
    );

    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<28} {:<32} {:<8} {:>12} {:>12}",
                truncate(&r.region, 28),
                truncate(&r.category, 32),
                format_month(r.period),
                fmt_rate(r.monthly_rate),
                fmt_rate(r.annual_rate),
            ),
        );
    }

    out
}

/// What can be selected, with defaults marked `*`.
pub fn format_options(options: &SelectionOptions) -> String {
    let mut out = String::new();

    match (options.months.first(), options.months.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Months: {} .. {} ({} total)\n",
            format_month(*first),
            format_month(*last),
            options.months.len()
        )),
        _ => out.push_str("Months: (none)\n"),
    }

    out.push_str("\nCountries/Regions:\n");
    for name in &options.regions {
        let mark = if options.default_region.as_deref() == Some(name.as_str()) { "*" } else { " " };
        out.push_str(&format!("{mark} {name}\n"));
    }

    out.push_str("\nCategories (COICOP):\n");
    for name in &options.categories {
        let mark = if options.default_category.as_deref() == Some(name.as_str()) { "*" } else { " " };
        out.push_str(&format!("{mark} {name}\n"));
    }

    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_rate(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())
}

fn fmt_pct(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}%")).unwrap_or_else(|| "n/a".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
