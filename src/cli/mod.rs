//! Command-line parsing for the price-index panel tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! ingest/transform code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{month_end, parse_month};
use crate::filter::FilterParams;
use crate::report::GroupBy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hicp", version, about = "Harmonised price index panel: monthly and annual inflation rates")]
pub struct Cli {
    /// Source CSV (overrides HICP_DATA_PATH).
    #[arg(long, global = true, value_name = "CSV")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dataset overview plus headline KPIs for the selection.
    Summary(SummaryArgs),
    /// Print the filtered table.
    Table(FilterArgs),
    /// Write the filtered table as CSV.
    Export(ExportArgs),
    /// Latest rates per (region, category).
    Latest(LatestArgs),
    /// Latest monthly and annual rate per series.
    Series(FilterArgs),
    /// List selectable months, regions and categories.
    Options,
}

/// Selection flags shared by every data command.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// First month to include (YYYY-MM).
    #[arg(long, value_parser = parse_month_arg)]
    pub from: Option<NaiveDate>,

    /// Last month to include (YYYY-MM).
    #[arg(long, value_parser = parse_month_arg)]
    pub to: Option<NaiveDate>,

    /// Country/region display name; repeat to select several. None selects all.
    #[arg(long = "region", value_name = "NAME")]
    pub regions: Vec<String>,

    /// Category display name; repeat to select several. None selects all.
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,
}

impl FilterArgs {
    pub fn to_params(&self) -> FilterParams {
        FilterParams {
            start: self.from,
            end: self.to.map(month_end),
            regions: self.regions.iter().cloned().collect(),
            categories: self.categories.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output file (default: stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct LatestArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Row ordering.
    #[arg(long, value_enum, default_value_t = GroupBy::Region)]
    pub by: GroupBy,
}

fn parse_month_arg(s: &str) -> Result<NaiveDate, String> {
    parse_month(s).ok_or_else(|| format!("invalid month '{s}', expected YYYY-MM"))
}
