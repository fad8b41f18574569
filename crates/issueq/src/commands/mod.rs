//! Command execution logic for CLI operations.
//!
//! The `CommandExecutor` loads a snapshot from an [`IssueSource`], applies
//! the effective configuration and hands the issues to the query engine.
//!
//! This module is organized into submodules by functional area:
//! - `query`: filtered and sorted issue lists
//! - `issue`: single-issue lookup and edits
//! - `stats`: aggregate counts

mod issue;
mod query;
mod stats;

#[cfg(test)]
pub mod test_helpers;

use crate::config::EffectiveConfig;
use crate::domain::Issue;
use crate::query::FilterContext;
use crate::storage::IssueSource;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

/// Executes CLI commands against a snapshot source.
///
/// Generic over the source to support different backends (JSON export,
/// in-memory).
pub struct CommandExecutor<S: IssueSource> {
    source: S,
    config: EffectiveConfig,
}

impl<S: IssueSource> CommandExecutor<S> {
    /// Create a new command executor with default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, EffectiveConfig::default())
    }

    /// Create a new command executor with the given configuration
    pub fn with_config(source: S, config: EffectiveConfig) -> Self {
        Self { source, config }
    }

    /// Filter context for `today` under the configured week start
    pub fn filter_context(&self, today: NaiveDate) -> FilterContext {
        FilterContext::new(today).with_week_start(self.config.week_start)
    }

    fn load_snapshot(&self) -> Result<Vec<Issue>> {
        let issues = self.source.list_issues()?;
        debug!(
            source = %self.source.describe(),
            issues = issues.len(),
            "loaded snapshot"
        );
        Ok(issues)
    }
}
