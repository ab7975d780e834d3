use async_trait::async_trait;
use parking_lot::Mutex;

use crate::catalog::names::OWNER_COUNT_QUERY;
use crate::catalog::version::VERSION_QUERY;
use crate::executor::{
    CatalogRow, CatalogValue, Error as ExecutorError, QueryExecutor, QueryParam,
};

#[derive(Debug, Clone)]
enum Response {
    Rows(Vec<CatalogRow>),
    Failure(String),
}

#[derive(Debug, Clone)]
struct Canned {
    sql: String,
    /// Only answer when `:tableName` has this value
    table_name: Option<String>,
    response: Response,
}

/// Executor answering known statements with canned rows. Statements it wasn't
/// told about return no rows. Every call is recorded.
#[derive(Debug, Default)]
pub struct MockExecutor {
    canned: Vec<Canned>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_response(mut self, sql: &str, table_name: Option<&str>, response: Response) -> Self {
        self.canned.push(Canned {
            sql: sql.to_string(),
            table_name: table_name.map(str::to_string),
            response,
        });
        self
    }

    pub fn with_rows(self, sql: &str, rows: Vec<CatalogRow>) -> Self {
        self.with_response(sql, None, Response::Rows(rows))
    }

    pub fn with_failure(self, sql: &str) -> Self {
        self.with_response(
            sql,
            None,
            Response::Failure(format!("mock failure for {sql:?}")),
        )
    }

    pub fn with_owner_count(self, table_name: &str, owners: i64) -> Self {
        self.with_response(
            OWNER_COUNT_QUERY,
            Some(table_name),
            Response::Rows(vec![CatalogRow::from_pairs([("cnt", owners)])]),
        )
    }

    pub fn with_version(self, version: &str) -> Self {
        self.with_rows(
            VERSION_QUERY,
            vec![CatalogRow::from_pairs([("ver", version)])],
        )
    }

    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().clone()
    }

    pub fn executed_queries(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(sql, _)| sql.clone()).collect()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn fetch_all(
        &self,
        sql: &str,
        params: &[QueryParam<'_>],
    ) -> Result<Vec<CatalogRow>, ExecutorError> {
        self.calls.lock().push((
            sql.to_string(),
            params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        ));

        let table_name = params
            .iter()
            .find(|(name, _)| *name == "tableName")
            .map(|(_, value)| *value);

        let canned = self.canned.iter().rev().find(|canned| {
            canned.sql == sql
                && match (&canned.table_name, table_name) {
                    (None, _) => true,
                    (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
                    (Some(_), None) => false,
                }
        });

        match canned.map(|canned| &canned.response) {
            Some(Response::Rows(rows)) => Ok(rows.clone()),
            Some(Response::Failure(reason)) => Err(ExecutorError::UnexpectedRows {
                reason: reason.clone(),
            }),
            None => Ok(vec![]),
        }
    }
}

/// A columns query row for a non-null, non-key column without a default
pub fn column_row(column_id: i64, name: &str, base_type: &str) -> CatalogRow {
    CatalogRow::from_pairs([
        ("column_id", CatalogValue::from(column_id)),
        ("column_name", CatalogValue::from(name)),
        ("base_type", CatalogValue::from(base_type)),
        ("width", CatalogValue::Null),
        ("scale", CatalogValue::from(0i64)),
        ("nulls", CatalogValue::from("N")),
        ("unique", CatalogValue::from("N")),
        ("pkey", CatalogValue::from("N")),
        ("column_type", CatalogValue::from("R")),
        ("default", CatalogValue::Null),
        ("sequence_name", CatalogValue::Null),
        ("remarks", CatalogValue::Null),
    ])
}
