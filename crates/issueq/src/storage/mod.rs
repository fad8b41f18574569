//! Snapshot sources the query engine reads issues from.
//!
//! This module defines the `IssueSource` trait that abstracts where an issue
//! snapshot comes from and where edits are written back, allowing different
//! backends (a JSON export on disk, an in-memory collection) to be used
//! interchangeably.

use crate::domain::Issue;
use anyhow::{anyhow, Result};

pub mod json;
pub mod memory;

pub use json::JsonSnapshot;
pub use memory::InMemorySnapshot;

/// Minimum length of an id prefix accepted by [`IssueSource::resolve_issue`].
pub const MIN_PREFIX_LEN: usize = 4;

/// Trait for backends that provide an issue snapshot.
///
/// Every call to `list_issues` returns an independent snapshot. The query
/// engine only reads; `save_issues` is used by `issueq update`.
///
/// # Examples
///
/// ```
/// use issueq::domain::Issue;
/// use issueq::storage::{InMemorySnapshot, IssueSource};
///
/// let issue = Issue::new("Fix bug", "user:alice");
/// let source = InMemorySnapshot::new(vec![issue.clone()]);
///
/// let loaded = source.resolve_issue(&issue.id).unwrap();
/// assert_eq!(loaded.title, "Fix bug");
/// ```
pub trait IssueSource {
    /// Load every issue in the snapshot, in snapshot order.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or deserialized.
    fn list_issues(&self) -> Result<Vec<Issue>>;

    /// Replace the snapshot with `issues`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save_issues(&self, issues: &[Issue]) -> Result<()>;

    /// Human-readable description of where issues come from (for logs).
    fn describe(&self) -> String;

    /// Find an issue by full id or unique prefix.
    ///
    /// # Errors
    ///
    /// - Prefix too short (< 4 chars) and not an exact id
    /// - No matching issue found: "Issue not found: {id}"
    /// - Multiple issues match: "Ambiguous ID '{prefix}' matches multiple issues: ..."
    fn resolve_issue(&self, id: &str) -> Result<Issue> {
        let issues = self.list_issues()?;

        if let Some(exact) = issues.iter().find(|i| i.id == id) {
            return Ok(exact.clone());
        }

        if id.len() < MIN_PREFIX_LEN {
            return Err(anyhow!(
                "Issue not found: {} (ID prefix must be at least {} characters)",
                id,
                MIN_PREFIX_LEN
            ));
        }

        let matches: Vec<&Issue> = issues.iter().filter(|i| i.id.starts_with(id)).collect();
        match matches.as_slice() {
            [] => Err(anyhow!("Issue not found: {}", id)),
            [single] => Ok((*single).clone()),
            many => Err(anyhow!(
                "Ambiguous ID '{}' matches multiple issues: {}",
                id,
                many.iter()
                    .map(|i| i.short_id())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Reject snapshots in which two issues share an id.
pub(crate) fn ensure_unique_ids(issues: &[Issue]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(issues.len());
    for issue in issues {
        if !seen.insert(issue.id.as_str()) {
            return Err(anyhow!("Invalid snapshot: duplicate issue id '{}'", issue.id));
        }
    }
    Ok(())
}
