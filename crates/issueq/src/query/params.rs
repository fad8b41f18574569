//! Parameter boundary: loosely-typed list parameters to a typed query.
//!
//! Issue lists are addressed with query-string style parameters such as
//! `assignee_id=None&label_name[]=bug&sort=due_date`. This layer validates
//! them once and produces an [`IssueQuery`]. Values the engine does not
//! recognise for `sort` or `due_date` are rejected, never coerced.

use super::error::QueryError;
use super::filter::{AssigneeFilter, DueDateBucket, FilterSpec, MilestoneFilter};
use super::sort::SortKey;
use super::IssueQuery;
use url::form_urlencoded;

/// Split a query string into decoded `(key, value)` pairs
///
/// A leading `?` is ignored; the rest is decoded as
/// `application/x-www-form-urlencoded`, so `+` becomes a space and `%XX`
/// escapes are percent-decoded. Pairs without `=` get an empty value.
///
/// ```
/// use issueq::query::params::parse_query_string;
///
/// let pairs = parse_query_string("?label_name%5B%5D=to+do&sort=due_date");
/// assert_eq!(pairs[0], ("label_name[]".to_string(), "to do".to_string()));
/// assert_eq!(pairs[1], ("sort".to_string(), "due_date".to_string()));
/// ```
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

impl IssueQuery {
    /// Build a query from decoded parameter pairs
    ///
    /// `default_sort` applies when no `sort` parameter is present. Unknown
    /// parameter names are ignored; they belong to other surfaces
    /// (pagination, rendering).
    pub fn from_params<I, K, V>(params: I, default_sort: SortKey) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = FilterSpec::default();
        let mut sort = default_sort;

        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "assignee_id" | "assignee" => filter.assignee = AssigneeFilter::parse(value),
                "author_id" | "author" => {
                    filter.author = non_empty(value).map(str::to_string);
                }
                "label_name" | "label_name[]" | "label_names" | "label_names[]" => {
                    for label in value.split(',').filter_map(non_empty) {
                        if !filter.labels.iter().any(|l| l == label) {
                            filter.labels.push(label.to_string());
                        }
                    }
                }
                "milestone_title" | "milestone" => {
                    filter.milestone = non_empty(value).map(MilestoneFilter::parse);
                }
                "due_date" => {
                    filter.due_date = match non_empty(value) {
                        Some(v) => Some(v.parse::<DueDateBucket>()?),
                        None => None,
                    };
                }
                "confidential" => {
                    filter.confidential = match value.trim() {
                        "" => None,
                        "true" | "1" | "yes" => Some(true),
                        "false" | "0" | "no" => Some(false),
                        other => {
                            return Err(QueryError::invalid(
                                "confidential",
                                other,
                                &["true", "false"],
                            ))
                        }
                    };
                }
                "search" => filter.search = non_empty(value).map(str::to_string),
                "sort" => {
                    if let Some(v) = non_empty(value) {
                        sort = v.parse::<SortKey>()?;
                    }
                }
                _ => {}
            }
        }

        Ok(IssueQuery { filter, sort })
    }

    /// Parse a raw query string, see [`parse_query_string`]
    pub fn parse(query: &str, default_sort: SortKey) -> Result<Self, QueryError> {
        Self::from_params(parse_query_string(query), default_sort)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
