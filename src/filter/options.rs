//! Selectable options and default preselection.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Panel;

/// Knobs for what is offered and preselected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsConfig {
    /// When set, only these region names are offered.
    pub region_allowlist: Option<BTreeSet<String>>,
    pub default_region: String,
    pub default_category: String,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            region_allowlist: None,
            default_region: "EU".to_string(),
            default_category: "All-items HICP".to_string(),
        }
    }
}

/// Everything a selector needs to present choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionOptions {
    pub months: Vec<NaiveDate>,
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    pub default_region: Option<String>,
    pub default_category: Option<String>,
}

impl SelectionOptions {
    pub fn from_panel(panel: &Panel, config: &OptionsConfig) -> Self {
        let regions: Vec<String> = panel
            .region_names()
            .into_iter()
            .filter(|name| {
                config
                    .region_allowlist
                    .as_ref()
                    .is_none_or(|allowed| allowed.contains(name))
            })
            .collect();
        let categories = panel.category_names();

        Self {
            months: panel.months(),
            default_region: pick_default(&regions, &config.default_region),
            default_category: pick_default(&categories, &config.default_category),
            regions,
            categories,
        }
    }

    /// The offered part of the user's region selection, or every offered
    /// region when the selection is empty.
    ///
    /// An empty result means nothing is selectable. Passing it on to
    /// [`crate::filter::apply_filters`] would select every region instead.
    pub fn effective_regions(&self, selected: &BTreeSet<String>) -> BTreeSet<String> {
        effective(selected, &self.regions)
    }

    /// Same as [`Self::effective_regions`], for categories.
    pub fn effective_categories(&self, selected: &BTreeSet<String>) -> BTreeSet<String> {
        effective(selected, &self.categories)
    }
}

fn pick_default(options: &[String], preferred: &str) -> Option<String> {
    if options.iter().any(|o| o == preferred) {
        Some(preferred.to_string())
    } else {
        options.first().cloned()
    }
}

fn effective(selected: &BTreeSet<String>, offered: &[String]) -> BTreeSet<String> {
    offered
        .iter()
        .filter(|name| selected.is_empty() || selected.contains(*name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;
    use crate::transform::build_panel;

    fn panel(regions: &[(&str, &str)], categories: &[(&str, &str)]) -> Panel {
        let mut records = Vec::new();
        for (code, name) in regions {
            for (ccode, cname) in categories {
                for m in [3, 1, 2] {
                    records.push(Record {
                        region_code: code.to_string(),
                        region_name: name.to_string(),
                        category_code: ccode.to_string(),
                        category_name: cname.to_string(),
                        period: NaiveDate::from_ymd_opt(2022, m, 1).unwrap(),
                        index_value: 100.0,
                    });
                }
            }
        }
        records.sort_by(|a, b| {
            (&a.region_code, &a.category_code, a.period).cmp(&(&b.region_code, &b.category_code, b.period))
        });
        build_panel(&records).unwrap()
    }

    #[test]
    fn defaults_prefer_configured_names() {
        let p = panel(
            &[("EU", "EU"), ("FR", "France")],
            &[("CP00", "All-items HICP"), ("CP01", "Food")],
        );
        let opts = SelectionOptions::from_panel(&p, &OptionsConfig::default());
        assert_eq!(opts.default_region.as_deref(), Some("EU"));
        assert_eq!(opts.default_category.as_deref(), Some("All-items HICP"));
        assert_eq!(opts.months.len(), 3);
        assert!(opts.months.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn defaults_fall_back_to_first_option() {
        let p = panel(&[("FR", "France"), ("DE", "Germany")], &[("CP01", "Food")]);
        let opts = SelectionOptions::from_panel(&p, &OptionsConfig::default());
        assert_eq!(opts.default_region.as_deref(), Some("France"));
        assert_eq!(opts.default_category.as_deref(), Some("Food"));
    }

    #[test]
    fn allowlist_limits_regions_and_effective_selection() {
        let p = panel(
            &[("FR", "France"), ("DE", "Germany"), ("MT", "Malta")],
            &[("CP00", "All-items HICP")],
        );
        let config = OptionsConfig {
            region_allowlist: Some(["France", "Germany"].iter().map(|s| s.to_string()).collect()),
            ..OptionsConfig::default()
        };
        let opts = SelectionOptions::from_panel(&p, &config);
        assert_eq!(opts.regions, vec!["France".to_string(), "Germany".to_string()]);

        let eff = opts.effective_regions(&BTreeSet::new());
        assert_eq!(eff.len(), 2);
        assert!(!eff.contains("Malta"));

        let picked: BTreeSet<String> = ["Germany".to_string()].into_iter().collect();
        assert_eq!(opts.effective_regions(&picked), picked);

        let outside: BTreeSet<String> = ["Germany", "Malta"].iter().map(|s| s.to_string()).collect();
        assert_eq!(opts.effective_regions(&outside), picked);
    }

    #[test]
    fn allowlist_matching_nothing_offers_nothing() {
        let p = panel(&[("FR", "France"), ("MT", "Malta")], &[("CP00", "All-items HICP")]);
        let config = OptionsConfig {
            region_allowlist: Some(["Spain".to_string()].into_iter().collect()),
            ..OptionsConfig::default()
        };
        let opts = SelectionOptions::from_panel(&p, &config);
        assert!(opts.regions.is_empty());
        assert_eq!(opts.default_region, None);
        assert!(opts.effective_regions(&BTreeSet::new()).is_empty());

        let food: BTreeSet<String> = ["Food".to_string()].into_iter().collect();
        assert!(opts.effective_categories(&food).is_empty());
        assert_eq!(opts.effective_categories(&BTreeSet::new()).len(), 1);
    }

    #[test]
    fn empty_panel_has_no_defaults() {
        let opts = SelectionOptions::from_panel(&Panel::default(), &OptionsConfig::default());
        assert!(opts.regions.is_empty());
        assert_eq!(opts.default_region, None);
    }
}
