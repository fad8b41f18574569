//! Aggregate counts over a snapshot

use super::*;
use crate::domain::queries::{compute_stats, IssueStats};

impl<S: IssueSource> CommandExecutor<S> {
    /// Count issues per due-date bucket relative to `today`
    pub fn stats(&self, today: NaiveDate) -> Result<IssueStats> {
        let issues = self.load_snapshot()?;
        Ok(compute_stats(&issues, &self.filter_context(today)))
    }
}
