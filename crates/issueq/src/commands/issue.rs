//! Single-issue lookup and edits

use super::*;
use crate::domain::{IssueUpdate, Milestone, MilestoneEdit};
use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};

impl<S: IssueSource> CommandExecutor<S> {
    /// Show one issue by full id or unique prefix
    pub fn show_issue(&self, id: &str) -> Result<Issue> {
        let issue = self.source.resolve_issue(id)?;
        debug!(id = %issue.id, "resolved issue");
        Ok(issue)
    }

    /// Edit one issue and write the snapshot back
    ///
    /// Returns the issue as stored and whether anything changed. Nothing is
    /// written when every edit was already in place.
    pub fn update_issue(
        &self,
        id: &str,
        update: &IssueUpdate,
        now: DateTime<Utc>,
    ) -> Result<(Issue, bool)> {
        if update.is_empty() {
            bail!("Invalid update: no changes specified");
        }
        if matches!(&update.title, Some(title) if title.trim().is_empty()) {
            bail!("Invalid update: issue title cannot be empty");
        }

        let target = self.source.resolve_issue(id)?;
        let mut issues = self.load_snapshot()?;

        let milestone = match &update.milestone {
            None => None,
            Some(MilestoneEdit::Clear) => Some(None),
            Some(MilestoneEdit::Set { title, due_date }) => {
                Some(Some(resolve_milestone(&issues, title, *due_date)?))
            }
        };

        let index = issues
            .iter()
            .position(|i| i.id == target.id)
            .ok_or_else(|| anyhow!("Issue not found: {}", id))?;
        let changed = update.apply(&mut issues[index], milestone, now);

        if changed {
            self.source.save_issues(&issues)?;
        }
        debug!(id = %target.id, changed, "updated issue");

        Ok((issues.swap_remove(index), changed))
    }
}

/// Find the milestone titled `title` among the snapshot's issues, or create it
fn resolve_milestone(
    issues: &[Issue],
    title: &str,
    due_date: Option<NaiveDate>,
) -> Result<Milestone> {
    let title = title.trim();
    if title.is_empty() {
        bail!("Invalid update: milestone title cannot be empty");
    }

    let existing = issues
        .iter()
        .filter_map(|i| i.milestone.as_ref())
        .find(|m| m.title == title);

    match existing {
        Some(milestone) if due_date.is_some() && due_date != milestone.due_date => bail!(
            "Invalid update: milestone '{}' already exists with due date {}",
            title,
            milestone
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "none".to_string())
        ),
        Some(milestone) => Ok(milestone.clone()),
        None => Ok(Milestone::new(title, due_date)),
    }
}
