//! Errors raised while building or validating a query.

use thiserror::Error;

/// Errors that can occur while turning caller input into a query
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A known parameter carried a value the engine does not recognise
    #[error("Invalid query: unknown {field} '{value}' (expected one of: {expected})")]
    InvalidQuery {
        field: String,
        value: String,
        expected: String,
    },
    /// A date argument could not be parsed
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl QueryError {
    pub(crate) fn invalid(field: &str, value: &str, expected: &[&str]) -> Self {
        QueryError::InvalidQuery {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}
