//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments and loads settings
//! - builds (or reuses) the panel for the source file
//! - applies the selection and prints/exports results

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cache::PanelCache;
use crate::cli::{Cli, Command, ExportArgs, FilterArgs, LatestArgs, SummaryArgs};
use crate::config::Settings;
use crate::domain::PanelView;
use crate::error::AppError;
use crate::filter::{SelectionOptions, apply_filters};
use crate::io::export::{table_rows, write_table_csv, write_table_csv_file};
use crate::report::{compute_kpis, latest_snapshot, series_summary};

pub mod pipeline;

use pipeline::LoadedPanel;

pub const NO_DATA_MESSAGE: &str = "No data for the selected filters.";

/// Entry point for the `hicp` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let cli = Cli::parse();
    let mut settings = Settings::from_env();
    if let Some(path) = cli.data.clone() {
        settings.data_path = path;
    }

    let mut cache = PanelCache::new();
    let loaded = cache.get_or_load(&settings.data_path)?;

    match cli.command {
        Command::Summary(args) => handle_summary(&settings, &loaded, args),
        Command::Table(args) => handle_table(&settings, &loaded, args),
        Command::Export(args) => handle_export(&settings, &loaded, args),
        Command::Latest(args) => handle_latest(&settings, &loaded, args),
        Command::Series(args) => handle_series(&settings, &loaded, args),
        Command::Options => handle_options(&settings, &loaded),
    }
}

fn init_logging() {
    // Logs go to stderr so tables and CSV on stdout stay pipeable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "hicp_panel=info".into()))
        .with_writer(io::stderr)
        .try_init();
}

/// Apply the selection.
///
/// With a region allow-list, only allowed regions can be selected and an
/// empty pick means every allowed region. When nothing allowed is left the
/// view is empty.
pub fn select<'a>(settings: &Settings, loaded: &'a LoadedPanel, args: &FilterArgs) -> PanelView<'a> {
    let mut params = args.to_params();
    if settings.options.region_allowlist.is_some() {
        let options = SelectionOptions::from_panel(&loaded.panel, &settings.options);
        params.regions = options.effective_regions(&params.regions);
        if params.regions.is_empty() {
            tracing::warn!("no allowed region matches the selection");
            return PanelView::new(&loaded.panel, Vec::new());
        }
    }
    apply_filters(&loaded.panel, &params)
}

fn handle_summary(settings: &Settings, loaded: &Arc<LoadedPanel>, args: SummaryArgs) -> Result<(), AppError> {
    let view = select(settings, loaded, &args.filter);
    let kpis = compute_kpis(&view);

    if args.json {
        let payload = serde_json::json!({
            "source": settings.data_path.display().to_string(),
            "ingest": &loaded.summary,
            "series": loaded.panel.series_count(),
            "period_range": loaded.panel.period_range(),
            "selected_rows": view.len(),
            "kpis": kpis,
        });
        let text = serde_json::to_string_pretty(&payload)
            .map_err(|e| AppError::new(4, format!("Failed to encode summary JSON: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    print!(
        "{}",
        crate::report::format_overview(&settings.data_path.display().to_string(), &loaded.panel, &loaded.summary)
    );
    println!();
    match kpis {
        Some(kpis) => print!("{}", crate::report::format_kpis(&kpis)),
        None => println!("{NO_DATA_MESSAGE}"),
    }
    Ok(())
}

fn handle_table(settings: &Settings, loaded: &Arc<LoadedPanel>, args: FilterArgs) -> Result<(), AppError> {
    let view = select(settings, loaded, &args);
    if view.is_empty() {
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    }
    print!("{}", crate::report::format_table(&table_rows(&view)));
    Ok(())
}

fn handle_export(settings: &Settings, loaded: &Arc<LoadedPanel>, args: ExportArgs) -> Result<(), AppError> {
    let view = select(settings, loaded, &args.filter);
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    export_view(&view, args.output.as_deref(), &mut lock)?;
    lock.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush stdout: {e}")))
}

/// Write `view` to `output`, or as CSV to `out` when no file is given.
///
/// With a file, an empty selection also reports [`NO_DATA_MESSAGE`] on `out`.
/// Without one, `out` carries the CSV only.
fn export_view<W: Write>(view: &PanelView<'_>, output: Option<&Path>, out: &mut W) -> Result<(), AppError> {
    match output {
        Some(path) => {
            write_table_csv_file(path, view)?;
            tracing::info!(rows = view.len(), path = %path.display(), "wrote filtered CSV");
            if view.is_empty() {
                writeln!(out, "{NO_DATA_MESSAGE}")
                    .map_err(|e| AppError::new(2, format!("Failed to write to stdout: {e}")))?;
            }
        }
        None => {
            if view.is_empty() {
                tracing::warn!("{NO_DATA_MESSAGE}");
            }
            write_table_csv(&mut *out, view)?;
        }
    }
    Ok(())
}

fn handle_latest(settings: &Settings, loaded: &Arc<LoadedPanel>, args: LatestArgs) -> Result<(), AppError> {
    let view = select(settings, loaded, &args.filter);
    if view.is_empty() {
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    }
    print!("{}", crate::report::format_latest(&latest_snapshot(&view, args.by)));
    Ok(())
}

fn handle_series(settings: &Settings, loaded: &Arc<LoadedPanel>, args: FilterArgs) -> Result<(), AppError> {
    let view = select(settings, loaded, &args);
    if view.is_empty() {
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    }
    print!("{}", crate::report::format_latest(&series_summary(&view)));
    Ok(())
}

fn handle_options(settings: &Settings, loaded: &Arc<LoadedPanel>) -> Result<(), AppError> {
    let options = SelectionOptions::from_panel(&loaded.panel, &settings.options);
    print!("{}", crate::report::format_options(&options));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::OptionsConfig;

    const SOURCE: &str = "[Year],[Month],[geo],[GeoName],[COICOP],[COICOP_Name],[Value]\n\
        2020,1,FR,France,CP00,All-items HICP,100\n\
        2020,1,MT,Malta,CP00,All-items HICP,100\n\
        2020,2,FR,France,CP00,All-items HICP,101\n\
        2020,2,MT,Malta,CP00,All-items HICP,102\n";

    #[test]
    fn empty_selection_without_allowlist_selects_everything() {
        let loaded = pipeline::load_panel(SOURCE.as_bytes()).unwrap();
        let view = select(&Settings::default(), &loaded, &FilterArgs::default());
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn allowlist_narrows_the_implicit_all() {
        let loaded = pipeline::load_panel(SOURCE.as_bytes()).unwrap();
        let settings = Settings {
            options: OptionsConfig {
                region_allowlist: Some(["France".to_string()].into_iter().collect()),
                ..OptionsConfig::default()
            },
            ..Settings::default()
        };
        let view = select(&settings, &loaded, &FilterArgs::default());
        assert_eq!(view.len(), 2);
        assert!(view.labeled().all(|r| r.region_name == "France"));
    }

    fn allowlist_settings(names: &[&str]) -> Settings {
        Settings {
            options: OptionsConfig {
                region_allowlist: Some(names.iter().map(|s| s.to_string()).collect()),
                ..OptionsConfig::default()
            },
            ..Settings::default()
        }
    }

    #[test]
    fn allowlist_matching_nothing_selects_nothing() {
        let loaded = pipeline::load_panel(SOURCE.as_bytes()).unwrap();
        let view = select(&allowlist_settings(&["Spain"]), &loaded, &FilterArgs::default());
        assert!(view.is_empty());
    }

    #[test]
    fn explicit_regions_outside_the_allowlist_are_dropped() {
        let loaded = pipeline::load_panel(SOURCE.as_bytes()).unwrap();
        let settings = allowlist_settings(&["France"]);

        let args = FilterArgs {
            regions: vec!["France".to_string(), "Malta".to_string()],
            ..FilterArgs::default()
        };
        let view = select(&settings, &loaded, &args);
        assert_eq!(view.len(), 2);
        assert!(view.labeled().all(|r| r.region_name == "France"));

        let args = FilterArgs {
            regions: vec!["Malta".to_string()],
            ..FilterArgs::default()
        };
        assert!(select(&settings, &loaded, &args).is_empty());
    }

    #[test]
    fn empty_export_to_file_reports_no_data() {
        let loaded = pipeline::load_panel(SOURCE.as_bytes()).unwrap();
        let view = select(&allowlist_settings(&["Spain"]), &loaded, &FilterArgs::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut out = Vec::new();
        export_view(&view, Some(&path), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), NO_DATA_MESSAGE);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.starts_with("Date,"));
    }

    #[test]
    fn export_to_stdout_carries_only_csv() {
        let loaded = pipeline::load_panel(SOURCE.as_bytes()).unwrap();
        let view = select(&Settings::default(), &loaded, &FilterArgs::default());
        let mut out = Vec::new();
        export_view(&view, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(!text.contains(NO_DATA_MESSAGE));
    }
}
