//! Filter stage: predicates over issue attributes.
//!
//! Every constraint in a [`FilterSpec`] is optional and they combine with AND.
//! Filtering never reorders or mutates issues; survivors keep input order.

use super::error::QueryError;
use crate::calendar;
use crate::domain::Issue;
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Evaluation context for date-relative predicates
///
/// `today` is always supplied by the caller so that filtering is
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext {
    pub today: NaiveDate,
    pub week_start: Weekday,
}

impl FilterContext {
    /// Context for `today` with weeks starting on Monday
    pub fn new(today: NaiveDate) -> Self {
        FilterContext {
            today,
            week_start: Weekday::Mon,
        }
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }
}

/// Assignee constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "user")]
pub enum AssigneeFilter {
    /// No constraint
    #[default]
    Any,
    /// Only issues nobody is assigned to
    Unassigned,
    /// Only issues assigned to this user (among possibly others)
    User(String),
}

impl AssigneeFilter {
    /// Parse the `assignee_id` parameter vocabulary
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "Any" | "any" => AssigneeFilter::Any,
            "None" | "none" | "0" => AssigneeFilter::Unassigned,
            user => AssigneeFilter::User(user.to_string()),
        }
    }

    fn matches(&self, issue: &Issue) -> bool {
        match self {
            AssigneeFilter::Any => true,
            AssigneeFilter::Unassigned => issue.is_unassigned(),
            AssigneeFilter::User(user) => issue.is_assigned_to(user),
        }
    }
}

/// Milestone constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "title")]
pub enum MilestoneFilter {
    /// Issues without a milestone
    NoMilestone,
    /// Issues with any milestone
    AnyMilestone,
    /// Issues whose milestone has exactly this title
    Title(String),
}

impl MilestoneFilter {
    /// Parse the `milestone_title` parameter vocabulary
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "None" | "none" | "No Milestone" => MilestoneFilter::NoMilestone,
            "Any" | "any" | "Any Milestone" => MilestoneFilter::AnyMilestone,
            title => MilestoneFilter::Title(title.to_string()),
        }
    }

    fn matches(&self, issue: &Issue) -> bool {
        match self {
            MilestoneFilter::NoMilestone => issue.milestone.is_none(),
            MilestoneFilter::AnyMilestone => issue.milestone.is_some(),
            MilestoneFilter::Title(title) => issue
                .milestone
                .as_ref()
                .map(|m| &m.title == title)
                .unwrap_or(false),
        }
    }
}

/// Named date-range predicate over `Issue::due_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateBucket {
    /// No due date set
    NoDueDate,
    /// Any due date set
    AnyDueDate,
    /// Due within the current week, inclusive
    DueThisWeek,
    /// Due within the current month, inclusive
    DueThisMonth,
    /// Due strictly before today
    Overdue,
}

impl DueDateBucket {
    pub const ALL: [DueDateBucket; 5] = [
        DueDateBucket::NoDueDate,
        DueDateBucket::AnyDueDate,
        DueDateBucket::DueThisWeek,
        DueDateBucket::DueThisMonth,
        DueDateBucket::Overdue,
    ];

    /// Canonical parameter value
    pub fn as_str(self) -> &'static str {
        match self {
            DueDateBucket::NoDueDate => "none",
            DueDateBucket::AnyDueDate => "any",
            DueDateBucket::DueThisWeek => "this_week",
            DueDateBucket::DueThisMonth => "this_month",
            DueDateBucket::Overdue => "overdue",
        }
    }

    /// Check a due date against this bucket relative to `ctx.today`
    pub fn matches(self, due_date: Option<NaiveDate>, ctx: &FilterContext) -> bool {
        match (self, due_date) {
            (DueDateBucket::NoDueDate, due) => due.is_none(),
            (DueDateBucket::AnyDueDate, due) => due.is_some(),
            (_, None) => false,
            (DueDateBucket::DueThisWeek, Some(due)) => {
                let start = calendar::start_of_week(ctx.today, ctx.week_start);
                let end = calendar::end_of_week(ctx.today, ctx.week_start);
                start <= due && due <= end
            }
            (DueDateBucket::DueThisMonth, Some(due)) => {
                calendar::start_of_month(ctx.today) <= due
                    && due <= calendar::end_of_month(ctx.today)
            }
            (DueDateBucket::Overdue, Some(due)) => due < ctx.today,
        }
    }
}

impl fmt::Display for DueDateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DueDateBucket {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "none" | "None" | "No Due Date" => Ok(DueDateBucket::NoDueDate),
            "any" | "Any" | "Any Due Date" => Ok(DueDateBucket::AnyDueDate),
            "week" | "this_week" | "this-week" | "Due This Week" => Ok(DueDateBucket::DueThisWeek),
            "month" | "this_month" | "this-month" | "Due This Month" => {
                Ok(DueDateBucket::DueThisMonth)
            }
            "overdue" | "Overdue" => Ok(DueDateBucket::Overdue),
            other => Err(QueryError::invalid(
                "due_date",
                other,
                &DueDateBucket::ALL.map(DueDateBucket::as_str),
            )),
        }
    }
}

/// Set of predicate constraints applied before sorting
///
/// The default value constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub assignee: AssigneeFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Issue must carry every one of these labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<MilestoneFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDateBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    /// Case-insensitive title substring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilterSpec {
    /// True when no constraint is set
    pub fn is_unconstrained(&self) -> bool {
        *self == FilterSpec::default()
    }

    /// Check whether one issue satisfies every constraint
    pub fn matches(&self, issue: &Issue, ctx: &FilterContext) -> bool {
        if !self.assignee.matches(issue) {
            return false;
        }

        if let Some(author) = &self.author {
            if &issue.author != author {
                return false;
            }
        }

        if !self.labels.iter().all(|label| issue.has_label(label)) {
            return false;
        }

        if let Some(milestone) = &self.milestone {
            if !milestone.matches(issue) {
                return false;
            }
        }

        if let Some(bucket) = self.due_date {
            if !bucket.matches(issue.due_date, ctx) {
                return false;
            }
        }

        if let Some(confidential) = self.confidential {
            if issue.confidential != confidential {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => issue
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

/// Filter a collection of issues
///
/// Returns references to the issues that match, in input order.
pub fn filter_issues<'a>(
    issues: &'a [Issue],
    spec: &FilterSpec,
    ctx: &FilterContext,
) -> Vec<&'a Issue> {
    issues.iter().filter(|i| spec.matches(i, ctx)).collect()
}
