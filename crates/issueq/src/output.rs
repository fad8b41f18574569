//! Structured output formatting for CLI commands.
//!
//! This module provides consistent JSON output formatting for both success
//! and error cases, ensuring machine-readable output that works well with
//! scripts and automation tools.

use chrono::{NaiveDate, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt::Display;
use std::io::{self, Write};

use crate::domain::queries::IssueStats;
use crate::domain::{Issue, MinimalIssue};
use crate::query::IssueQuery;

/// Version of the JSON output format
const OUTPUT_VERSION: &str = "0.1.0";

// ============================================================================
// Output Context for Quiet Mode
// ============================================================================

/// Context for controlling output verbosity
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    /// Create a new output context
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Print essential output (always shown unless --json)
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        if !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print informational message (suppressed by --quiet or --json)
    pub fn print_info(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet && !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print a serialized JSON document (only in --json mode)
    pub fn print_json<T: Serialize>(&self, output: &JsonOutput<T>) -> io::Result<()> {
        if self.json {
            let text = output.to_json_string().map_err(io::Error::other)?;
            writeln_safe(&text)
        } else {
            Ok(())
        }
    }

    /// Check if JSON mode is enabled
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Safe println that handles broken pipes gracefully
fn writeln_safe(msg: &str) -> io::Result<()> {
    match writeln!(io::stdout(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Silently exit on broken pipe (expected when piping to head, etc.)
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// JSON Output Types
// ============================================================================

/// Wrapper for successful command output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    /// Create a new successful output with the given data
    pub fn success(data: T, command: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata::new(command),
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Wrapper for error output with suggestions
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
    pub metadata: Metadata,
}

impl JsonError {
    /// Create a new error output
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
                suggestions: Vec::new(),
            },
            metadata: Metadata::new(command),
        }
    }

    /// Add details to the error
    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }

    /// Add multiple suggestions to the error
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.error.suggestions.extend(suggestions);
        self
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Error details including code, message, and suggestions
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code (e.g., "INVALID_QUERY", "SNAPSHOT_NOT_FOUND")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Suggested actions to resolve the error
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

// ============================================================================
// Exit Codes
// ============================================================================

/// Standardized exit codes for the issueq CLI
///
/// # Examples
///
/// ```rust
/// use issueq::ExitCode;
///
/// assert_eq!(ExitCode::InvalidArgument.code(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded (0)
    Success = 0,

    /// Generic error (1)
    GenericError = 1,

    /// Invalid arguments, query parameters or configuration (2)
    InvalidArgument = 2,

    /// Resource not found - snapshot or issue (3)
    NotFound = 3,

    /// External failure - file system, malformed snapshot (10)
    ExternalError = 10,
}

impl ExitCode {
    /// Convert exit code to i32 for `std::process::exit`
    pub fn code(self) -> i32 {
        self as i32
    }
}

// ============================================================================
// Error Codes (String constants for JSON responses)
// ============================================================================

/// Standard error codes for issueq operations (JSON format)
pub struct ErrorCode;

impl ErrorCode {
    pub const INVALID_QUERY: &'static str = "INVALID_QUERY";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const ISSUE_NOT_FOUND: &'static str = "ISSUE_NOT_FOUND";
    pub const SNAPSHOT_NOT_FOUND: &'static str = "SNAPSHOT_NOT_FOUND";
    pub const IO_ERROR: &'static str = "IO_ERROR";
    pub const GENERIC_ERROR: &'static str = "GENERIC_ERROR";

    /// Map error code string to exit code
    pub fn to_exit_code(code: &str) -> ExitCode {
        match code {
            Self::INVALID_QUERY | Self::INVALID_ARGUMENT => ExitCode::InvalidArgument,
            Self::ISSUE_NOT_FOUND | Self::SNAPSHOT_NOT_FOUND => ExitCode::NotFound,
            Self::IO_ERROR => ExitCode::ExternalError,
            _ => ExitCode::GenericError,
        }
    }
}

/// Metadata included in all JSON responses
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp when the response was generated
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: chrono::DateTime<Utc>,
    /// Version of the output format
    pub version: String,
    /// Command that generated this response
    pub command: String,
}

impl Metadata {
    fn new(command: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            version: OUTPUT_VERSION.to_string(),
            command: command.into(),
        }
    }
}

/// Serialize timestamp in ISO 8601 format
fn serialize_timestamp<S>(dt: &chrono::DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for `query` command
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// The validated query that was run
    pub query: IssueQuery,
    /// Reference day used for due-date buckets
    pub today: NaiveDate,
    pub issues: Vec<MinimalIssue>,
    pub count: usize,
}

/// Response for `query --ids`
#[derive(Debug, Serialize)]
pub struct IdsResponse {
    pub ids: Vec<String>,
    pub count: usize,
}

/// Response for `show` command
#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub issue: Issue,
}

/// Response for `stats` command
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub today: NaiveDate,
    #[serde(flatten)]
    pub stats: IssueStats,
}

/// Response for `update` command
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub issue: Issue,
    /// False when every requested edit was already in place
    pub changed: bool,
}

// ============================================================================
// Human-readable formatting
// ============================================================================

/// One list line: `<short id> <title> [due ...] [milestone ...] [@assignees]`
pub fn format_issue_line(issue: &Issue) -> String {
    let mut line = format!("{:<8} {}", issue.short_id(), issue.title);

    if let Some(due) = issue.due_date {
        line.push_str(&format!("  due:{}", due));
    }
    if let Some(milestone) = &issue.milestone {
        line.push_str(&format!("  milestone:{}", milestone.title));
    }
    if !issue.assignees.is_empty() {
        line.push_str(&format!("  @{}", issue.assignees.join(",@")));
    }
    if issue.confidential {
        line.push_str("  [confidential]");
    }

    line
}

/// Multi-line detail block for `show`
pub fn format_issue_detail(issue: &Issue) -> String {
    let mut lines = vec![
        format!("ID:           {}", issue.id),
        format!("Title:        {}", issue.title),
        format!("Author:       {}", issue.author),
    ];

    let assignees = if issue.assignees.is_empty() {
        "(unassigned)".to_string()
    } else {
        issue.assignees.join(", ")
    };
    lines.push(format!("Assignees:    {}", assignees));

    if let Some(milestone) = &issue.milestone {
        let due = milestone
            .due_date
            .map(|d| format!(" (due {})", d))
            .unwrap_or_default();
        lines.push(format!("Milestone:    {}{}", milestone.title, due));
    }
    if let Some(due) = issue.due_date {
        lines.push(format!("Due date:     {}", due));
    }
    if !issue.labels.is_empty() {
        lines.push(format!("Labels:       {}", issue.labels.join(", ")));
    }
    lines.push(format!("Created:      {}", issue.created_at.to_rfc3339()));
    lines.push(format!("Updated:      {}", issue.updated_at.to_rfc3339()));
    lines.push(format!("Confidential: {}", issue.confidential));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Milestone;
    use crate::query::{DueDateBucket, FilterSpec, SortKey};
    use serde_json::json;

    #[test]
    fn test_json_output_success() {
        let data = json!({"id": "123", "title": "Test"});
        let output = JsonOutput::success(data, "show");

        assert!(output.success);
        assert_eq!(output.data["id"], "123");
        assert_eq!(output.metadata.version, "0.1.0");
        assert_eq!(output.metadata.command, "show");
    }

    #[test]
    fn test_json_error_basic() {
        let error = JsonError::new("TEST_ERROR", "This is a test error", "test command");

        assert!(!error.success);
        assert_eq!(error.error.code, "TEST_ERROR");
        assert!(error.error.details.is_none());
        assert!(error.error.suggestions.is_empty());
        assert_eq!(
            ErrorCode::to_exit_code(&error.error.code),
            ExitCode::GenericError
        );
    }

    #[test]
    fn test_json_error_serialization() {
        let error = JsonError::new(ErrorCode::INVALID_QUERY, "Bad sort", "query")
            .with_details(json!({"field": "sort"}))
            .with_suggestions(vec!["Use one of: due_date".to_string()]);

        let json_str = error.to_json_string().unwrap();
        assert!(json_str.contains("\"success\": false"));
        assert!(json_str.contains("\"code\": \"INVALID_QUERY\""));
        assert!(json_str.contains("\"details\""));
        assert!(json_str.contains("\"suggestions\""));
        assert_eq!(
            ErrorCode::to_exit_code(&error.error.code),
            ExitCode::InvalidArgument
        );
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::to_exit_code(ErrorCode::SNAPSHOT_NOT_FOUND),
            ExitCode::NotFound
        );
        assert_eq!(ErrorCode::to_exit_code(ErrorCode::IO_ERROR), ExitCode::ExternalError);
        assert_eq!(ExitCode::ExternalError.code(), 10);
    }

    #[test]
    fn test_query_response_serialization() {
        let query = IssueQuery::new(
            FilterSpec {
                due_date: Some(DueDateBucket::Overdue),
                ..Default::default()
            },
            SortKey::DueDate,
        );
        let response = QueryResponse {
            query,
            today: NaiveDate::from_ymd_opt(2013, 12, 9).unwrap(),
            issues: vec![],
            count: 0,
        };

        let value = serde_json::to_value(JsonOutput::success(response, "query")).unwrap();
        assert_eq!(value["data"]["query"]["sort"], "due_date");
        assert_eq!(value["data"]["query"]["filter"]["due_date"], "overdue");
        assert_eq!(value["data"]["query"]["filter"]["assignee"]["kind"], "any");
        assert_eq!(value["data"]["today"], "2013-12-09");
    }

    #[test]
    fn test_format_issue_line() {
        let mut issue = Issue::new("Fix login", "user:root");
        issue.id = "abcdef0123".to_string();
        issue.due_date = NaiveDate::from_ymd_opt(2013, 12, 11);
        issue.milestone = Some(Milestone::new("v1.0", None));
        issue.assignees = vec!["alice".to_string(), "bob".to_string()];

        let line = format_issue_line(&issue);
        assert!(line.starts_with("abcdef01 Fix login"));
        assert!(line.contains("due:2013-12-11"));
        assert!(line.contains("milestone:v1.0"));
        assert!(line.contains("@alice,@bob"));
    }

    #[test]
    fn test_format_issue_detail_unassigned() {
        let issue = Issue::new("Plan", "user:root");
        let detail = format_issue_detail(&issue);
        assert!(detail.contains("Assignees:    (unassigned)"));
        assert!(!detail.contains("Milestone:"));
    }
}
