//! Issue Query Engine Library
//!
//! Filters and sorts collections of issues the way an issue tracker's list
//! view does: assignee, label and due-date predicates, then one of several
//! stable orderings. The binary wraps this library around JSON snapshots,
//! but every query runs against plain slices and can be embedded directly.

pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod output;
pub mod query;
pub mod schema;
pub mod storage;

// Re-export commonly used types
pub use commands::CommandExecutor;
pub use domain::{Issue, IssueUpdate, Milestone, MilestoneEdit};
pub use output::{ExitCode, JsonError, JsonOutput};
pub use query::{FilterContext, FilterSpec, IssueQuery, QueryError, SortKey};
pub use storage::{InMemorySnapshot, IssueSource, JsonSnapshot};
