//! Aggregate counts over issue collections.
//!
//! Used by `issueq stats`. Every count goes through the same [`FilterSpec`]
//! predicates as `issueq query`.

use crate::domain::Issue;
use crate::query::{filter_issues, AssigneeFilter, DueDateBucket, FilterContext, FilterSpec};
use serde::Serialize;

/// Aggregate counts over a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueStats {
    pub total: usize,
    pub unassigned: usize,
    pub confidential: usize,
    /// One entry per due-date bucket, in [`DueDateBucket::ALL`] order
    pub due_date: Vec<BucketCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket: DueDateBucket,
    pub count: usize,
}

/// Count issues per due-date bucket plus the unassigned and confidential totals.
///
/// Buckets overlap (an overdue issue is also in `any`), so the bucket counts
/// do not sum to `total`.
pub fn compute_stats(issues: &[Issue], ctx: &FilterContext) -> IssueStats {
    let count = |spec: FilterSpec| filter_issues(issues, &spec, ctx).len();

    IssueStats {
        total: issues.len(),
        unassigned: count(FilterSpec {
            assignee: AssigneeFilter::Unassigned,
            ..Default::default()
        }),
        confidential: count(FilterSpec {
            confidential: Some(true),
            ..Default::default()
        }),
        due_date: DueDateBucket::ALL
            .iter()
            .map(|&bucket| BucketCount {
                bucket,
                count: count(FilterSpec {
                    due_date: Some(bucket),
                    ..Default::default()
                }),
            })
            .collect(),
    }
}
