//! Property-based tests for query engine invariants
//!
//! These tests use `proptest` to check filter and sort invariants across
//! randomly generated snapshots.

use super::*;
use crate::domain::Milestone;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

const USERS: [&str; 3] = ["user:1", "user:2", "user:3"];
const LABELS: [&str; 3] = ["bug", "feature", "ui"];

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2013, 12, 9).unwrap()
}

// Generator for optional dates within roughly two months of today
fn due_date_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    prop_oneof![
        Just(None),
        (-40i64..40i64).prop_map(|offset| Some(today() + Duration::days(offset))),
    ]
}

fn subset_strategy(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(any::<bool>(), pool.len()).prop_map(move |mask| {
        pool.iter()
            .zip(mask)
            .filter(|(_, keep)| *keep)
            .map(|(name, _)| name.to_string())
            .collect()
    })
}

// Generator for issues; ids are assigned afterwards so they stay unique
fn issue_strategy() -> impl Strategy<Value = Issue> {
    (
        subset_strategy(&USERS),
        subset_strategy(&LABELS),
        due_date_strategy(),
        due_date_strategy(),
        0i64..500i64,
        0i64..500i64,
    )
        .prop_map(|(assignees, labels, due_date, milestone_due, created, updated)| {
            let base = Utc.with_ymd_and_hms(2013, 12, 1, 0, 0, 0).unwrap();
            Issue {
                id: String::new(),
                title: String::new(),
                author: "user:root".to_string(),
                assignees,
                milestone: milestone_due.map(|d| Milestone::new(d.to_string(), Some(d))),
                due_date,
                labels,
                created_at: base + Duration::minutes(created),
                updated_at: base + Duration::minutes(created + updated),
                confidential: false,
            }
        })
}

fn snapshot_strategy() -> impl Strategy<Value = Vec<Issue>> {
    prop::collection::vec(issue_strategy(), 0..30).prop_map(|mut issues| {
        for (index, issue) in issues.iter_mut().enumerate() {
            issue.id = format!("issue-{}", index);
            issue.title = issue.id.clone();
        }
        issues
    })
}

fn sort_key_strategy() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn bucket_strategy() -> impl Strategy<Value = DueDateBucket> {
    prop::sample::select(DueDateBucket::ALL.to_vec())
}

fn ids(issues: &[&Issue]) -> Vec<String> {
    issues.iter().map(|i| i.id.clone()).collect()
}

proptest! {
    // An unset filter keeps every issue in input order
    #[test]
    fn prop_unset_filter_is_identity(issues in snapshot_strategy()) {
        let ctx = FilterContext::new(today());
        let filtered = filter_issues(&issues, &FilterSpec::default(), &ctx);
        let expected: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
        prop_assert_eq!(ids(&filtered), expected);
    }

    // "none" and a specific user select exactly the matching subsets
    #[test]
    fn prop_assignee_filters_are_exact(
        issues in snapshot_strategy(),
        user in prop::sample::select(USERS.to_vec()),
    ) {
        let ctx = FilterContext::new(today());

        let unassigned = FilterSpec { assignee: AssigneeFilter::Unassigned, ..Default::default() };
        let expected: Vec<String> = issues
            .iter()
            .filter(|i| i.assignees.is_empty())
            .map(|i| i.id.clone())
            .collect();
        prop_assert_eq!(ids(&filter_issues(&issues, &unassigned, &ctx)), expected);

        let by_user = FilterSpec {
            assignee: AssigneeFilter::User(user.to_string()),
            ..Default::default()
        };
        let expected: Vec<String> = issues
            .iter()
            .filter(|i| i.assignees.iter().any(|a| a == user))
            .map(|i| i.id.clone())
            .collect();
        prop_assert_eq!(ids(&filter_issues(&issues, &by_user, &ctx)), expected);
    }

    // Overdue never yields a missing due date or one on/after today
    #[test]
    fn prop_overdue_is_strictly_past(issues in snapshot_strategy()) {
        let ctx = FilterContext::new(today());
        let spec = FilterSpec { due_date: Some(DueDateBucket::Overdue), ..Default::default() };

        for issue in filter_issues(&issues, &spec, &ctx) {
            let due = issue.due_date;
            prop_assert!(due.is_some());
            prop_assert!(due.unwrap() < today());
        }
    }

    // Missing due dates never match a date-range bucket
    #[test]
    fn prop_null_due_date_only_in_none_bucket(
        issues in snapshot_strategy(),
        bucket in bucket_strategy(),
    ) {
        let ctx = FilterContext::new(today());
        let spec = FilterSpec { due_date: Some(bucket), ..Default::default() };

        for issue in filter_issues(&issues, &spec, &ctx) {
            prop_assert_eq!(issue.due_date.is_none(), bucket == DueDateBucket::NoDueDate);
        }
    }

    // Due-date sort places every dated issue before every undated one and
    // keeps input order among equal dates
    #[test]
    fn prop_due_date_sort_nulls_last_and_stable(issues in snapshot_strategy()) {
        let ctx = FilterContext::new(today());
        let sorted = query(&issues, &FilterSpec::default(), SortKey::DueDate, &ctx);

        let first_null = sorted.iter().position(|i| i.due_date.is_none()).unwrap_or(sorted.len());
        prop_assert!(sorted[first_null..].iter().all(|i| i.due_date.is_none()));

        let position = |id: &str| issues.iter().position(|i| i.id == id).unwrap();
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].due_date.is_none() || pair[1].due_date.is_none()
                || pair[0].due_date <= pair[1].due_date);
            if pair[0].due_date == pair[1].due_date {
                prop_assert!(position(pair[0].id.as_str()) < position(pair[1].id.as_str()));
            }
        }
    }

    // Milestone sort never places an undated milestone before a dated one
    #[test]
    fn prop_milestone_sort_nulls_last(issues in snapshot_strategy()) {
        let ctx = FilterContext::new(today());
        let sorted = query(&issues, &FilterSpec::default(), SortKey::Milestone, &ctx);

        let first_null = sorted
            .iter()
            .position(|i| i.milestone_due_date().is_none())
            .unwrap_or(sorted.len());
        prop_assert!(sorted[first_null..].iter().all(|i| i.milestone_due_date().is_none()));
    }

    // Running the same query twice yields identical output
    #[test]
    fn prop_query_is_idempotent(
        issues in snapshot_strategy(),
        key in sort_key_strategy(),
        bucket in prop::option::of(bucket_strategy()),
        labels in subset_strategy(&LABELS),
    ) {
        let ctx = FilterContext::new(today());
        let spec = FilterSpec { labels, due_date: bucket, ..Default::default() };

        let first = ids(&query(&issues, &spec, key, &ctx));
        let second = ids(&query(&issues, &spec, key, &ctx));
        prop_assert_eq!(first, second);
    }

    // Sorting only permutes: output has the same members as the filter stage
    #[test]
    fn prop_sort_preserves_membership(
        issues in snapshot_strategy(),
        key in sort_key_strategy(),
    ) {
        let ctx = FilterContext::new(today());
        let mut sorted = ids(&query(&issues, &FilterSpec::default(), key, &ctx));
        let mut input: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
        sorted.sort();
        input.sort();
        prop_assert_eq!(sorted, input);
    }
}

// A shared snapshot answers concurrent queries identically
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_concurrent_queries_agree(
        issues in snapshot_strategy(),
        key in sort_key_strategy(),
    ) {
        let snapshot = Arc::new(issues);
        let ctx = FilterContext::new(today());
        let expected = ids(&query(&snapshot, &FilterSpec::default(), key, &ctx));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let snapshot = Arc::clone(&snapshot);
                thread::spawn(move || ids(&query(&snapshot, &FilterSpec::default(), key, &ctx)))
            })
            .collect();

        for handle in handles {
            prop_assert_eq!(handle.join().unwrap(), expected.clone());
        }
    }
}
