//! Issue query engine: filter, then sort.
//!
//! A query is a straight two-stage pipeline over a read-only snapshot:
//! 1. **Filter**: keep issues matching every constraint in a
//!    [`FilterSpec`], preserving input order.
//! 2. **Sort**: stable ordering by a [`SortKey`].
//!
//! Loosely-typed list parameters are validated once at the boundary by
//! [`params`], which produces an [`IssueQuery`].
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use issueq::query::{FilterContext, IssueQuery, SortKey};
//!
//! # fn example() -> Result<(), issueq::query::QueryError> {
//! let query = IssueQuery::parse("assignee_id=None&sort=due_date", SortKey::default())?;
//! let today = NaiveDate::from_ymd_opt(2013, 12, 9).unwrap();
//! let matched = query.run(&[], &FilterContext::new(today));
//! assert!(matched.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod error;
mod filter;
pub mod params;
mod sort;

#[cfg(test)]
mod query_proptests;

pub use error::QueryError;
pub use filter::{
    filter_issues, AssigneeFilter, DueDateBucket, FilterContext, FilterSpec, MilestoneFilter,
};
pub use sort::{sort_issues, SortKey};

use crate::domain::Issue;
use serde::Serialize;

/// A validated filter plus sort order, ready for evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueQuery {
    pub filter: FilterSpec,
    pub sort: SortKey,
}

impl IssueQuery {
    pub fn new(filter: FilterSpec, sort: SortKey) -> Self {
        IssueQuery { filter, sort }
    }

    /// Run the query against a snapshot
    ///
    /// Returns references into `issues`; nothing is cloned or mutated.
    pub fn run<'a>(&self, issues: &'a [Issue], ctx: &FilterContext) -> Vec<&'a Issue> {
        query(issues, &self.filter, self.sort, ctx)
    }

    /// Run the query and return only the ordered ids
    pub fn run_ids(&self, issues: &[Issue], ctx: &FilterContext) -> Vec<String> {
        self.run(issues, ctx)
            .into_iter()
            .map(|i| i.id.clone())
            .collect()
    }
}

/// `sort(filter(issues, spec), key)`
pub fn query<'a>(
    issues: &'a [Issue],
    spec: &FilterSpec,
    key: SortKey,
    ctx: &FilterContext,
) -> Vec<&'a Issue> {
    let mut matched = filter_issues(issues, spec, ctx);
    sort_issues(&mut matched, key);
    matched
}
