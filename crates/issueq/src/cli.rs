//! Command-line interface definitions using clap.

use crate::calendar::parse_date;
use crate::domain::{IssueUpdate, MilestoneEdit};
use crate::query::QueryError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Issue list query tool
///
/// Filters and sorts a JSON snapshot of issues the way an issue tracker's
/// list view does, with deterministic output for scripts.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments, query parameters or configuration
///   3  - Resource not found (snapshot, issue)
///  10  - External failure (file system, malformed snapshot)
#[derive(Parser)]
#[command(name = "issueq")]
#[command(about = "Filter and sort issue snapshots", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: .issueq/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter and sort issues
    ///
    /// Flags and --params may be combined; flags win over --params.
    ///
    /// Examples:
    ///   issueq query --snapshot issues.json --due-date overdue --sort due_date
    ///   issueq query --params 'assignee_id=None&label_name[]=bug'
    Query(QueryArgs),

    /// Show one issue by id or unique id prefix
    Show {
        /// Issue ID (full or prefix of at least 4 characters)
        id: String,

        #[command(flatten)]
        source: SnapshotArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count issues per due-date bucket
    Stats {
        #[command(flatten)]
        source: SnapshotArgs,

        /// Reference day for due-date buckets (default: today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit one issue in place and write the snapshot back
    ///
    /// Only the named fields change; `updated_at` is bumped when anything
    /// actually differs.
    ///
    /// Examples:
    ///   issueq update 3f2a --assign user:2 --due-date 2013-12-20
    ///   issueq update 3f2a --milestone v1.0 --milestone-due 2013-12-11
    ///   issueq update 3f2a --no-milestone --unassign user:1
    Update(UpdateArgs),

    /// Print the JSON Schema of the snapshot format
    Schema,
}

/// Where to read the snapshot from
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Snapshot file (JSON array of issues or {"issues": [...]})
    #[arg(short, long, env = "ISSUEQ_SNAPSHOT", default_value = "issues.json")]
    pub snapshot: PathBuf,
}

/// Arguments for `issueq query`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: SnapshotArgs,

    /// Raw list parameters, e.g. 'sort=due_date&due_date=overdue'
    #[arg(long, value_name = "QUERY_STRING")]
    pub params: Option<String>,

    /// Assignee: user id, 'None' for unassigned, 'Any' for no constraint
    #[arg(long)]
    pub assignee: Option<String>,

    /// Author user id
    #[arg(long)]
    pub author: Option<String>,

    /// Required label (repeatable; issues must carry all)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Milestone title, 'None' or 'Any'
    #[arg(long)]
    pub milestone: Option<String>,

    /// Due-date bucket: none, any, this_week, this_month, overdue
    #[arg(long, value_name = "BUCKET")]
    pub due_date: Option<String>,

    /// Only confidential (true) or only public (false) issues
    #[arg(long, value_name = "BOOL")]
    pub confidential: Option<String>,

    /// Case-insensitive title substring
    #[arg(long)]
    pub search: Option<String>,

    /// Sort key: created_date, created_asc, recently_updated, updated_asc,
    /// due_date, due_date_later, milestone
    #[arg(long)]
    pub sort: Option<String>,

    /// Reference day for due-date buckets (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<String>,

    /// Print only issue ids, one per line
    #[arg(long)]
    pub ids: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `issueq update`
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Issue ID (full or prefix of at least 4 characters)
    pub id: String,

    #[command(flatten)]
    pub source: SnapshotArgs,

    #[arg(short, long)]
    pub title: Option<String>,

    /// Add an assignee (repeatable)
    #[arg(long, value_name = "USER")]
    pub assign: Vec<String>,

    /// Remove an assignee (repeatable)
    #[arg(long, value_name = "USER")]
    pub unassign: Vec<String>,

    /// Remove every assignee before applying --assign
    #[arg(long)]
    pub clear_assignees: bool,

    /// Add label(s) (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Remove label(s) (repeatable)
    #[arg(long)]
    pub remove_label: Vec<String>,

    /// Move to the milestone with this title (reused if one exists)
    #[arg(long, value_name = "TITLE")]
    pub milestone: Option<String>,

    /// Due date for a newly created milestone
    #[arg(long, value_name = "YYYY-MM-DD", requires = "milestone")]
    pub milestone_due: Option<String>,

    /// Remove the milestone
    #[arg(long, conflicts_with = "milestone")]
    pub no_milestone: bool,

    /// Set the issue's due date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub due_date: Option<String>,

    /// Remove the issue's due date
    #[arg(long, conflicts_with = "due_date")]
    pub no_due_date: bool,

    /// Mark the issue confidential (true) or public (false)
    #[arg(long, value_name = "BOOL")]
    pub confidential: Option<bool>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl UpdateArgs {
    /// Convert the flags into an [`IssueUpdate`], validating dates
    pub fn to_update(&self) -> Result<IssueUpdate, QueryError> {
        let milestone = match &self.milestone {
            Some(title) => Some(MilestoneEdit::Set {
                title: title.clone(),
                due_date: self.milestone_due.as_deref().map(parse_date).transpose()?,
            }),
            None if self.no_milestone => Some(MilestoneEdit::Clear),
            None => None,
        };

        let due_date = match &self.due_date {
            Some(value) => Some(Some(parse_date(value)?)),
            None if self.no_due_date => Some(None),
            None => None,
        };

        Ok(IssueUpdate {
            title: self.title.clone(),
            clear_assignees: self.clear_assignees,
            unassign: self.unassign.clone(),
            assign: self.assign.clone(),
            add_labels: self.labels.clone(),
            remove_labels: self.remove_label.clone(),
            milestone,
            due_date,
            confidential: self.confidential,
        })
    }
}

impl QueryArgs {
    /// Flatten `--params` and the typed flags into one parameter list
    ///
    /// `--params` pairs come first so explicit flags override them.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self
            .params
            .as_deref()
            .map(crate::query::params::parse_query_string)
            .unwrap_or_default();

        let mut push = |key: &str, value: &Option<String>| {
            if let Some(v) = value {
                params.push((key.to_string(), v.clone()));
            }
        };
        push("assignee_id", &self.assignee);
        push("author_id", &self.author);
        push("milestone_title", &self.milestone);
        push("due_date", &self.due_date);
        push("confidential", &self.confidential);
        push("search", &self.search);
        push("sort", &self.sort);

        for label in &self.labels {
            params.push(("label_name[]".to_string(), label.clone()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_query_flags_override_params() {
        let cli = Cli::try_parse_from([
            "issueq",
            "query",
            "--snapshot",
            "s.json",
            "--params",
            "sort=milestone&due_date=overdue",
            "--sort",
            "due_date",
            "-l",
            "bug",
        ])
        .unwrap();

        let Commands::Query(args) = cli.command else {
            panic!("expected query command");
        };
        let query = crate::query::IssueQuery::from_params(
            args.to_params(),
            crate::query::SortKey::default(),
        )
        .unwrap();

        assert_eq!(query.sort, crate::query::SortKey::DueDate);
        assert_eq!(
            query.filter.due_date,
            Some(crate::query::DueDateBucket::Overdue)
        );
        assert_eq!(query.filter.labels, vec!["bug"]);
    }

    #[test]
    fn test_update_flags_to_edits() {
        let cli = Cli::try_parse_from([
            "issueq",
            "update",
            "abcd",
            "--assign",
            "user:2",
            "--unassign",
            "user:1",
            "--milestone",
            "v1.0",
            "--milestone-due",
            "2013-12-11",
            "--no-due-date",
            "--confidential",
            "true",
        ])
        .unwrap();

        let Commands::Update(args) = cli.command else {
            panic!("expected update command");
        };
        let update = args.to_update().unwrap();

        assert_eq!(update.assign, vec!["user:2"]);
        assert_eq!(update.unassign, vec!["user:1"]);
        assert_eq!(
            update.milestone,
            Some(MilestoneEdit::Set {
                title: "v1.0".to_string(),
                due_date: chrono::NaiveDate::from_ymd_opt(2013, 12, 11),
            })
        );
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.confidential, Some(true));
    }

    #[test]
    fn test_update_rejects_conflicting_flags() {
        assert!(Cli::try_parse_from([
            "issueq", "update", "abcd", "--milestone", "v1.0", "--no-milestone"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "issueq", "update", "abcd", "--due-date", "2013-12-11", "--no-due-date"
        ])
        .is_err());
        assert!(
            Cli::try_parse_from(["issueq", "update", "abcd", "--milestone-due", "2013-12-11"])
                .is_err()
        );
    }

    #[test]
    fn test_update_rejects_bad_date() {
        let cli =
            Cli::try_parse_from(["issueq", "update", "abcd", "--due-date", "12/11/2013"]).unwrap();
        let Commands::Update(args) = cli.command else {
            panic!("expected update command");
        };
        assert!(matches!(
            args.to_update(),
            Err(QueryError::InvalidDate(_))
        ));
    }
}
