//! `table_query`: list records matching a filter.

use recordpilot_core::error::ToolError;
use recordpilot_core::platform::{ListQuery, RecordStore};
use recordpilot_core::tool::ToolKind;
use tracing::debug;

use crate::Outcome;
use crate::grammar::{require_table, split_segments};

/// Records returned per query.
pub const QUERY_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgs {
    pub table: String,
    /// Forwarded verbatim; may be empty.
    pub filter: String,
}

impl QueryArgs {
    /// `table_name|query_string`
    pub fn parse(raw: &str) -> Result<Self, ToolError> {
        let parts = split_segments(ToolKind::Query, raw, 2)?;
        Ok(Self {
            table: require_table(ToolKind::Query, parts[0])?,
            filter: parts[1].to_string(),
        })
    }

    pub async fn run(&self, store: &dyn RecordStore) -> Result<Outcome, ToolError> {
        debug!(table = %self.table, filter = %self.filter, "table_query");
        let query = ListQuery::new(self.filter.clone(), QUERY_LIMIT).with_display_values();
        let records = store.list(&self.table, &query).await?;
        if records.is_empty() {
            Ok(Outcome::NotFound)
        } else {
            Ok(Outcome::Records(records))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::CountingStore;
    use serde_json::json;

    #[test]
    fn parses_table_and_filter() {
        let args = QueryArgs::parse("sys_user|email=admin@example.com").unwrap();
        assert_eq!(args.table, "sys_user");
        assert_eq!(args.filter, "email=admin@example.com");
    }

    #[test]
    fn filter_keeps_later_separators() {
        let args = QueryArgs::parse("incident|short_descriptionLIKEa|b").unwrap();
        assert_eq!(args.filter, "short_descriptionLIKEa|b");
    }

    #[test]
    fn empty_filter_allowed() {
        let args = QueryArgs::parse("sys_script|").unwrap();
        assert_eq!(args.filter, "");
    }

    #[test]
    fn no_separator_is_parse_error() {
        assert!(matches!(
            QueryArgs::parse("sys_user email=x"),
            Err(ToolError::Parse { .. })
        ));
    }

    #[test]
    fn empty_table_is_validation_error() {
        assert!(matches!(
            QueryArgs::parse(" |active=true"),
            Err(ToolError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn run_requests_five_display_values() {
        let store = CountingStore::default().with_records(vec![json!({"name": "Alice"})]);
        let outcome = QueryArgs::parse("sys_user|nameLIKEAlice")
            .unwrap()
            .run(&store)
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Records(ref r) if r.len() == 1));
        let last = store.last_list().unwrap();
        assert_eq!(last.0, "sys_user");
        assert_eq!(last.1.limit, QUERY_LIMIT);
        assert!(last.1.display_value);
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let store = CountingStore::default();
        let outcome = QueryArgs::parse("sys_user|active=false")
            .unwrap()
            .run(&store)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::NotFound);
    }
}
