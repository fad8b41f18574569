//! Configuration file loading and parsing.
//!
//! issueq reads optional settings from `.issueq/config.toml` (or a path given
//! with `--config`). If no config file exists, the system falls back to
//! sensible defaults.

use crate::calendar;
use crate::query::SortKey;
use anyhow::{anyhow, Context, Result};
use chrono::Weekday;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".issueq/config.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueqConfig {
    /// Query defaults (optional).
    pub query: Option<QueryConfig>,
    /// Output defaults (optional).
    pub output: Option<OutputConfig>,
}

/// Query defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryConfig {
    /// Sort key used when a query names none (default: "created_date").
    pub default_sort: Option<String>,
    /// First day of the week for the `this_week` bucket (default: "monday").
    pub week_start: Option<String>,
}

impl QueryConfig {
    /// Get the default sort key, rejecting unknown names.
    pub fn default_sort(&self) -> Result<SortKey> {
        match &self.default_sort {
            Some(name) => name
                .parse::<SortKey>()
                .with_context(|| format!("Invalid [query] default_sort in config: '{}'", name)),
            None => Ok(SortKey::default()),
        }
    }

    /// Get the configured week start, rejecting unknown weekday names.
    pub fn week_start(&self) -> Result<Weekday> {
        match &self.week_start {
            Some(name) => calendar::parse_weekday(name).ok_or_else(|| {
                anyhow!(
                    "Invalid [query] week_start in config: '{}'. Expected a weekday name like 'monday'",
                    name
                )
            }),
            None => Ok(Weekday::Mon),
        }
    }
}

/// Output defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Emit JSON unless told otherwise (default: false).
    pub json: Option<bool>,
}

impl OutputConfig {
    pub fn json(&self) -> bool {
        self.json.unwrap_or(false)
    }
}

impl IssueqConfig {
    /// Load configuration from `path` if it exists.
    ///
    /// Returns an empty config (all fields None) if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(IssueqConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: IssueqConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Resolve the config path: explicit override or the default location.
    pub fn resolve_path(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_PATH))
    }

    /// Validated settings with defaults applied.
    pub fn effective(&self) -> Result<EffectiveConfig> {
        let query = self.query.clone().unwrap_or_default();
        let output = self.output.clone().unwrap_or_default();

        Ok(EffectiveConfig {
            default_sort: query.default_sort()?,
            week_start: query.week_start()?,
            json: output.json(),
        })
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub default_sort: SortKey,
    pub week_start: Weekday,
    pub json: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        EffectiveConfig {
            default_sort: SortKey::default(),
            week_start: Weekday::Mon,
            json: false,
        }
    }
}
