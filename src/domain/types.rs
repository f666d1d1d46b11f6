//! Shared domain types.
//!
//! These types are intentionally kept small and `Copy`-friendly where possible
//! so a panel of a few hundred thousand rows stays cheap to scan and filter.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{LabelId, NameId};

/// Rates with an absolute value above this many percentage points are nulled.
pub const OUTLIER_THRESHOLD_PCT: f64 = 500.0;

/// Lag (in recorded observations) for the month-over-month rate.
pub const MOM_LAG: usize = 1;

/// Lag (in recorded observations) for the year-over-year rate.
pub const YOY_LAG: usize = 12;

/// A required semantic column of the source feed.
///
/// Source files name these columns differently; [`LogicalField::aliases`] lists
/// every accepted spelling (already normalized to lowercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalField {
    Year,
    Month,
    RegionCode,
    RegionName,
    CategoryCode,
    CategoryName,
    IndexValue,
}

impl LogicalField {
    pub const ALL: [LogicalField; 7] = [
        LogicalField::Year,
        LogicalField::Month,
        LogicalField::RegionCode,
        LogicalField::RegionName,
        LogicalField::CategoryCode,
        LogicalField::CategoryName,
        LogicalField::IndexValue,
    ];

    /// Canonical name, used in schema error messages.
    pub fn name(self) -> &'static str {
        match self {
            LogicalField::Year => "year",
            LogicalField::Month => "month",
            LogicalField::RegionCode => "region_code",
            LogicalField::RegionName => "region_name",
            LogicalField::CategoryCode => "category_code",
            LogicalField::CategoryName => "category_name",
            LogicalField::IndexValue => "index_value",
        }
    }

    /// Accepted header spellings, lowercase.
    ///
    /// The bracketed forms are the ones used by the Eurostat HICP export
    /// (`[Year]`, `[geo]`, `[COICOP_Name]`, ...).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalField::Year => &["[year]", "year"],
            LogicalField::Month => &["[month]", "month"],
            LogicalField::RegionCode => &["[geo]", "geo", "region_code"],
            LogicalField::RegionName => &["[geoname]", "geo_name", "geoname", "region_name"],
            LogicalField::CategoryCode => &["[coicop]", "coicop", "category_code"],
            LogicalField::CategoryName => &["[coicop_name]", "coicop_name", "category_name"],
            LogicalField::IndexValue => &["[value]", "value", "index", "index_value"],
        }
    }
}

/// Which derived rate a consumer is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    /// Month-over-month.
    Monthly,
    /// Year-over-year.
    Annual,
}

/// A validated source row, before rates are derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub region_code: String,
    pub region_name: String,
    pub category_code: String,
    pub category_name: String,
    /// First day of the observed month.
    pub period: NaiveDate,
    pub index_value: f64,
}

/// Grouping key of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SeriesKey {
    pub region: LabelId,
    pub category: LabelId,
}

/// One row of the panel.
///
/// Region and category are dictionary ids; resolve them through the owning
/// [`crate::domain::Panel`]. The series is keyed on the codes, while the name
/// ids keep the display names exactly as this row carried them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub region: LabelId,
    pub category: LabelId,
    pub region_name: NameId,
    pub category_name: NameId,
    pub period: NaiveDate,
    pub index_value: f64,
    pub mom_rate: Option<f64>,
    pub yoy_rate: Option<f64>,
}

impl Observation {
    pub fn key(&self) -> SeriesKey {
        SeriesKey {
            region: self.region,
            category: self.category,
        }
    }

    pub fn rate(&self, kind: RateKind) -> Option<f64> {
        match kind {
            RateKind::Monthly => self.mom_rate,
            RateKind::Annual => self.yoy_rate,
        }
    }
}

/// First day of `(year, month)`, or `None` if that is not a calendar month.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    month_start(y, m)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Parse a `YYYY-MM` month label into its first day.
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let (y, m) = s.trim().split_once('-')?;
    month_start(y.parse().ok()?, m.parse().ok()?)
}

/// Format a period as `YYYY-MM`.
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_start_rejects_invalid_months() {
        assert!(month_start(2020, 0).is_none());
        assert!(month_start(2020, 13).is_none());
        assert_eq!(
            month_start(2020, 2),
            NaiveDate::from_ymd_opt(2020, 2, 1)
        );
    }

    #[test]
    fn month_end_handles_leap_years_and_december() {
        let feb = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(month_end(feb), NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        let dec = NaiveDate::from_ymd_opt(2021, 12, 1).unwrap();
        assert_eq!(month_end(dec), NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
    }

    #[test]
    fn parse_month_labels() {
        assert_eq!(parse_month("2021-03"), NaiveDate::from_ymd_opt(2021, 3, 1));
        assert!(parse_month("2021-13").is_none());
        assert!(parse_month("march").is_none());
        assert_eq!(format_month(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()), "2021-03");
    }

    #[test]
    fn rate_selects_the_matching_column() {
        let obs = Observation {
            region: LabelId(0),
            category: LabelId(0),
            region_name: NameId(0),
            category_name: NameId(0),
            period: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            index_value: 100.0,
            mom_rate: Some(0.5),
            yoy_rate: None,
        };
        assert_eq!(obs.rate(RateKind::Monthly), Some(0.5));
        assert_eq!(obs.rate(RateKind::Annual), None);
    }

    #[test]
    fn aliases_are_lowercase() {
        for field in LogicalField::ALL {
            for alias in field.aliases() {
                assert_eq!(*alias, alias.to_lowercase());
            }
        }
    }
}
