//! Environment-driven settings.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Command-line flags override whatever is loaded here.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::filter::OptionsConfig;

pub const ENV_DATA_PATH: &str = "HICP_DATA_PATH";
pub const ENV_REGION_ALLOWLIST: &str = "HICP_REGION_ALLOWLIST";
pub const ENV_DEFAULT_REGION: &str = "HICP_DEFAULT_REGION";
pub const ENV_DEFAULT_CATEGORY: &str = "HICP_DEFAULT_CATEGORY";

pub const DEFAULT_DATA_PATH: &str = "data/data hicp.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub options: OptionsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            options: OptionsConfig::default(),
        }
    }
}

impl Settings {
    /// Load `.env` (if any) and read settings from the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let region_allowlist = non_empty(ENV_REGION_ALLOWLIST).map(|raw| parse_list(&raw));

        Self {
            data_path: non_empty(ENV_DATA_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            options: OptionsConfig {
                region_allowlist,
                default_region: non_empty(ENV_DEFAULT_REGION).unwrap_or(defaults.options.default_region),
                default_category: non_empty(ENV_DEFAULT_CATEGORY)
                    .unwrap_or(defaults.options.default_category),
            },
        }
    }
}

fn parse_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
