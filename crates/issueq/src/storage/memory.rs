//! In-memory snapshot source.
//!
//! Holds issues behind an `Arc<RwLock<..>>`, so clones share the same
//! snapshot and can be handed to several threads at once.

use crate::domain::Issue;
use crate::storage::{ensure_unique_ids, IssueSource};
use anyhow::{anyhow, Result};
use std::sync::{Arc, RwLock};

/// In-memory snapshot source.
///
/// Clones share the same data, so an edit saved through one clone is seen
/// by every other.
///
/// # Examples
///
/// ```
/// use issueq::domain::Issue;
/// use issueq::storage::{InMemorySnapshot, IssueSource};
///
/// let source = InMemorySnapshot::new(vec![Issue::new("Test", "user:alice")]);
/// assert_eq!(source.list_issues().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    issues: Arc<RwLock<Vec<Issue>>>,
}

impl InMemorySnapshot {
    /// Wrap a collection of issues.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues: Arc::new(RwLock::new(issues)),
        }
    }
}

impl IssueSource for InMemorySnapshot {
    fn list_issues(&self) -> Result<Vec<Issue>> {
        let issues = self
            .issues
            .read()
            .map_err(|_| anyhow!("In-memory snapshot lock poisoned"))?;
        ensure_unique_ids(&issues)?;
        Ok(issues.clone())
    }

    fn save_issues(&self, issues: &[Issue]) -> Result<()> {
        let mut stored = self
            .issues
            .write()
            .map_err(|_| anyhow!("In-memory snapshot lock poisoned"))?;
        *stored = issues.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        match self.issues.read() {
            Ok(issues) => format!("in-memory snapshot ({} issues)", issues.len()),
            Err(_) => "in-memory snapshot".to_string(),
        }
    }
}
