//! Test helper functions for command tests.
//!
//! Provides reusable setup functions to eliminate duplication across test modules.

use crate::commands::CommandExecutor;
use crate::config::EffectiveConfig;
use crate::domain::Issue;
use crate::query::SortKey;
use crate::storage::InMemorySnapshot;
use chrono::{Duration, NaiveDate, TimeZone, Utc};

/// Create an executor over an in-memory snapshot with default configuration.
pub fn setup(issues: Vec<Issue>) -> CommandExecutor<InMemorySnapshot> {
    CommandExecutor::new(InMemorySnapshot::new(issues))
}

/// Create an executor whose config names a default sort key.
pub fn setup_with_default_sort(
    issues: Vec<Issue>,
    default_sort: SortKey,
) -> CommandExecutor<InMemorySnapshot> {
    let config = EffectiveConfig {
        default_sort,
        ..Default::default()
    };
    CommandExecutor::with_config(InMemorySnapshot::new(issues), config)
}

/// Issue `id` created `minutes_ago` minutes before 2013-12-09 12:00 UTC.
pub fn issue(id: &str, minutes_ago: i64) -> Issue {
    let ts = Utc.with_ymd_and_hms(2013, 12, 9, 12, 0, 0).unwrap() - Duration::minutes(minutes_ago);
    Issue {
        id: id.to_string(),
        title: id.to_string(),
        author: "user:root".to_string(),
        assignees: vec![],
        milestone: None,
        due_date: None,
        labels: vec![],
        created_at: ts,
        updated_at: ts,
        confidential: false,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
