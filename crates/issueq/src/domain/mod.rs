//! Core domain types for issue lists.
//!
//! This module defines the records the query engine reads: issues, the
//! milestones they reference, and the minimal projection used for list output.
//! The engine treats all of them as read-only snapshots.

pub mod queries;

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of issues with its own due date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Milestone {
    /// Unique identifier
    pub id: String,
    /// Display title, also used for `milestone_title` filtering
    pub title: String,
    /// Target date; a milestone without one is not comparable when sorting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Milestone {
    /// Create a milestone with a fresh id
    pub fn new(title: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            due_date,
        }
    }
}

/// An issue representing a trackable unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    /// Unique identifier
    pub id: String,
    /// Short summary of the issue
    pub title: String,
    /// User who opened the issue
    pub author: String,
    /// Users assigned to the issue (empty = unassigned)
    #[serde(default)]
    pub assignees: Vec<String>,
    /// Milestone the issue is scheduled for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
    /// Issue-level due date, independent of the milestone's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Label names attached to the issue
    #[serde(default)]
    pub labels: Vec<String>,
    /// When the issue was opened
    pub created_at: DateTime<Utc>,
    /// When the issue was last modified
    pub updated_at: DateTime<Utc>,
    /// Whether the issue is hidden from non-members
    #[serde(default)]
    pub confidential: bool,
}

impl Issue {
    /// Create a new unassigned, unlabelled issue stamped with the current time
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            author: author.into(),
            assignees: Vec::new(),
            milestone: None,
            due_date: None,
            labels: Vec::new(),
            created_at: now,
            updated_at: now,
            confidential: false,
        }
    }

    /// True when nobody is assigned
    pub fn is_unassigned(&self) -> bool {
        self.assignees.is_empty()
    }

    /// Check whether `user` is one of the assignees
    pub fn is_assigned_to(&self, user: &str) -> bool {
        self.assignees.iter().any(|a| a == user)
    }

    /// Check whether the issue carries a label with exactly this name
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    /// Due date of the referenced milestone, if both exist
    pub fn milestone_due_date(&self) -> Option<NaiveDate> {
        self.milestone.as_ref().and_then(|m| m.due_date)
    }

    /// Get short ID (first 8 characters of the id)
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Project to the minimal representation used in list output
    pub fn to_minimal(&self) -> MinimalIssue {
        MinimalIssue {
            id: self.id.clone(),
            title: self.title.clone(),
            assignees: self.assignees.clone(),
            due_date: self.due_date,
            milestone: self.milestone.as_ref().map(|m| m.title.clone()),
        }
    }
}

/// Requested change to an issue's milestone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneEdit {
    /// Remove the milestone
    Clear,
    /// Move to the milestone with this title, creating it when no issue in
    /// the snapshot references one yet
    Set {
        title: String,
        due_date: Option<NaiveDate>,
    },
}

/// Field edits applied by `issueq update`
///
/// Every field is optional; the default value edits nothing. Assignee edits
/// run in the order clear, remove, add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub clear_assignees: bool,
    pub unassign: Vec<String>,
    pub assign: Vec<String>,
    pub add_labels: Vec<String>,
    pub remove_labels: Vec<String>,
    pub milestone: Option<MilestoneEdit>,
    /// `Some(None)` removes the due date
    pub due_date: Option<Option<NaiveDate>>,
    pub confidential: Option<bool>,
}

impl IssueUpdate {
    /// True when no edit was requested
    pub fn is_empty(&self) -> bool {
        *self == IssueUpdate::default()
    }

    /// Apply the edits to `issue`; returns whether the issue changed.
    ///
    /// `milestone` is the milestone edit already resolved against the
    /// snapshot (`Some(None)` clears it). `updated_at` is only touched when
    /// something changed.
    pub fn apply(
        &self,
        issue: &mut Issue,
        milestone: Option<Option<Milestone>>,
        now: DateTime<Utc>,
    ) -> bool {
        let before = issue.clone();

        if let Some(title) = &self.title {
            issue.title = title.trim().to_string();
        }

        if self.clear_assignees {
            issue.assignees.clear();
        }
        issue.assignees.retain(|a| !self.unassign.contains(a));
        for user in &self.assign {
            if !issue.is_assigned_to(user) {
                issue.assignees.push(user.clone());
            }
        }

        issue.labels.retain(|l| !self.remove_labels.contains(l));
        for label in &self.add_labels {
            if !issue.has_label(label) {
                issue.labels.push(label.clone());
            }
        }

        if let Some(milestone) = milestone {
            issue.milestone = milestone;
        }
        if let Some(due_date) = self.due_date {
            issue.due_date = due_date;
        }
        if let Some(confidential) = self.confidential {
            issue.confidential = confidential;
        }

        let changed = *issue != before;
        if changed {
            issue.updated_at = now;
        }
        changed
    }
}

/// Minimal issue representation for list output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MinimalIssue {
    pub id: String,
    pub title: String,
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

/// On-disk snapshot document
///
/// Accepts either a bare array of issues or an object wrapping them, so both
/// `[...]` and `{"issues": [...]}` deserialize.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SnapshotDocument {
    /// `[...]`
    Bare(Vec<Issue>),
    /// `{"issues": [...]}`
    Wrapped { issues: Vec<Issue> },
}

impl SnapshotDocument {
    pub fn into_issues(self) -> Vec<Issue> {
        match self {
            SnapshotDocument::Bare(issues) => issues,
            SnapshotDocument::Wrapped { issues } => issues,
        }
    }
}
