//! Issue query operations

use super::*;
use crate::query::{IssueQuery, QueryError};

impl<S: IssueSource> CommandExecutor<S> {
    /// Validate list parameters, falling back to the configured default sort
    pub fn parse_query<I, K, V>(&self, params: I) -> Result<IssueQuery, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        IssueQuery::from_params(params, self.config.default_sort)
    }

    /// Run a query against a fresh snapshot
    pub fn run_query(&self, query: &IssueQuery, today: NaiveDate) -> Result<Vec<Issue>> {
        let issues = self.load_snapshot()?;
        let ctx = self.filter_context(today);

        let matched: Vec<Issue> = query.run(&issues, &ctx).into_iter().cloned().collect();
        debug!(
            sort = %query.sort,
            matched = matched.len(),
            total = issues.len(),
            "query evaluated"
        );

        Ok(matched)
    }

    /// Run a query and return only the ordered ids
    pub fn query_ids(&self, query: &IssueQuery, today: NaiveDate) -> Result<Vec<String>> {
        Ok(self
            .run_query(query, today)?
            .into_iter()
            .map(|i| i.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_helpers::{date, issue, setup};
    use crate::query::{DueDateBucket, SortKey};

    #[test]
    fn test_run_query_filters_and_sorts() {
        let mut foo = issue("foo", 0);
        foo.due_date = Some(date(2013, 12, 10));
        let mut bar = issue("bar", 1);
        bar.due_date = Some(date(2013, 12, 15));
        let baz = issue("baz", 2);

        let executor = setup(vec![baz, bar, foo]);
        let query = executor
            .parse_query([("sort", "due_date"), ("due_date", "any")])
            .unwrap();

        let ids = executor.query_ids(&query, date(2013, 12, 9)).unwrap();
        assert_eq!(ids, vec!["foo", "bar"]);
        assert_eq!(query.filter.due_date, Some(DueDateBucket::AnyDueDate));
    }

    #[test]
    fn test_parse_query_uses_configured_default_sort() {
        let executor = crate::commands::test_helpers::setup_with_default_sort(vec![], SortKey::Milestone);
        let query = executor.parse_query(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(query.sort, SortKey::Milestone);
    }

    #[test]
    fn test_empty_snapshot() {
        let executor = setup(vec![]);
        let query = executor.parse_query([("sort", "milestone")]).unwrap();
        assert!(executor.run_query(&query, date(2013, 12, 9)).unwrap().is_empty());
    }
}
