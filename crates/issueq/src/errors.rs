//! Actionable error formatting for improved user experience.
//!
//! This module provides utilities for creating error messages with:
//! - Clear error description
//! - Possible causes (diagnostics)
//! - Remediation steps (actionable fixes)

use crate::query::QueryError;
use std::fmt;
use std::path::Path;

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use issueq::errors::ActionableError;
///
/// let error = ActionableError::new("Snapshot not found: issues.json")
///     .with_cause("The export may not have been generated yet")
///     .with_remedy("Pass the snapshot path explicitly: issueq query --snapshot <file>");
///
/// eprintln!("{}", error);
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    /// The main error message
    error: String,
    /// Possible causes (diagnostic hints)
    causes: Vec<String>,
    /// Remediation steps (how to fix)
    remediation: Vec<String>,
}

impl ActionableError {
    /// Create a new actionable error with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    /// Remediation steps, in the order they were added.
    pub fn remedies(&self) -> &[String] {
        &self.remediation
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

/// Helper for rejected query parameters.
pub fn invalid_query(err: &QueryError) -> ActionableError {
    match err {
        QueryError::InvalidQuery {
            field,
            value,
            expected,
        } => ActionableError::new(err.to_string())
            .with_cause(format!("'{}' is not a recognised value for {}", value, field))
            .with_remedy(format!("Use one of: {}", expected)),
        QueryError::InvalidDate(value) => ActionableError::new(err.to_string())
            .with_cause(format!("'{}' is not a calendar date", value))
            .with_remedy("Write dates as YYYY-MM-DD, e.g. --today 2013-12-09"),
    }
}

/// Helper for an update request that cannot be applied.
pub fn invalid_update(message: &str) -> ActionableError {
    ActionableError::new(message)
        .with_cause("No field flag was given, or a value conflicts with the snapshot")
        .with_remedy("See the editable fields: issueq update --help")
}

/// Helper for a snapshot file that does not exist.
pub fn snapshot_not_found(path: &Path) -> ActionableError {
    ActionableError::new(format!("Snapshot not found: {}", path.display()))
        .with_cause("The snapshot path may be misspelled")
        .with_cause("ISSUEQ_SNAPSHOT may point at a stale location")
        .with_remedy("Pass the snapshot explicitly: issueq query --snapshot <file>")
        .with_remedy("Print the expected format: issueq schema")
}

/// Helper for an issue id that matched nothing.
pub fn issue_not_found(id: &str) -> ActionableError {
    ActionableError::new(format!("Issue not found: {}", id))
        .with_cause("The issue ID may be incorrect")
        .with_cause("The snapshot may predate the issue")
        .with_remedy("List issue ids: issueq query --ids")
}
