//! Sort stage: stable orderings over issue attributes.
//!
//! Date-based keys never place a missing value before a comparable one,
//! whichever direction the key sorts in.

use super::error::QueryError;
use crate::domain::Issue;
use serde::Serialize;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordering criterion applied after filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest created first
    #[default]
    CreatedDate,
    /// Oldest created first
    CreatedAsc,
    /// Most recently updated first
    RecentlyUpdated,
    /// Least recently updated first
    UpdatedAsc,
    /// Earliest due date first, no due date last
    DueDate,
    /// Earliest due date first, no due date last
    DueDateLater,
    /// Earliest milestone due date first, no comparable milestone last
    Milestone,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::CreatedDate,
        SortKey::CreatedAsc,
        SortKey::RecentlyUpdated,
        SortKey::UpdatedAsc,
        SortKey::DueDate,
        SortKey::DueDateLater,
        SortKey::Milestone,
    ];

    /// Canonical parameter value
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::CreatedDate => "created_date",
            SortKey::CreatedAsc => "created_asc",
            SortKey::RecentlyUpdated => "recently_updated",
            SortKey::UpdatedAsc => "updated_asc",
            SortKey::DueDate => "due_date",
            SortKey::DueDateLater => "due_date_later",
            SortKey::Milestone => "milestone",
        }
    }

    /// Compare two issues under this key
    pub fn compare(self, a: &Issue, b: &Issue) -> Ordering {
        match self {
            SortKey::CreatedDate => b.created_at.cmp(&a.created_at),
            SortKey::CreatedAsc => a.created_at.cmp(&b.created_at),
            SortKey::RecentlyUpdated => b.updated_at.cmp(&a.updated_at),
            SortKey::UpdatedAsc => a.updated_at.cmp(&b.updated_at),
            SortKey::DueDate | SortKey::DueDateLater => {
                ascending_nulls_last(a.due_date, b.due_date)
            }
            SortKey::Milestone => {
                ascending_nulls_last(a.milestone_due_date(), b.milestone_due_date())
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "created_date" | "created_desc" => Ok(SortKey::CreatedDate),
            "created_asc" => Ok(SortKey::CreatedAsc),
            "recently_updated" | "updated_desc" => Ok(SortKey::RecentlyUpdated),
            "updated_asc" => Ok(SortKey::UpdatedAsc),
            "due_date" | "due_date_asc" => Ok(SortKey::DueDate),
            "due_date_later" => Ok(SortKey::DueDateLater),
            "milestone" | "milestone_due_asc" => Ok(SortKey::Milestone),
            other => Err(QueryError::invalid(
                "sort",
                other,
                &SortKey::ALL.map(SortKey::as_str),
            )),
        }
    }
}

fn ascending_nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort issues in place under `key`
///
/// The sort is stable: issues that compare equal keep their relative order.
/// Works on owned issues and on borrowed ones alike.
pub fn sort_issues<T: Borrow<Issue>>(issues: &mut [T], key: SortKey) {
    issues.sort_by(|a, b| key.compare(a.borrow(), b.borrow()));
}
