use tracing::debug;

use crate::executor::{Error as ExecutorError, QueryExecutor};

/// Number of owners that have a table with the given bare name
pub const OWNER_COUNT_QUERY: &str =
    "SELECT COUNT(*) AS cnt FROM SYS.SYSTABLE WHERE UPPER(table_name)=UPPER(:tableName)";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedTableName {
    /// Owner of the table
    pub schema_name: String,
    pub name: String,
    /// `name`, or `schema.name` when the owner isn't the default schema
    pub full_name: String,
}

/// Split a table reference into its (optional) owner and bare name, dropping any
/// bracket quoting. The engine has no catalog level, so only the last two parts
/// of a longer reference are kept.
pub fn split_table_name(raw_name: &str) -> (Option<String>, String) {
    let unquoted = raw_name.replace(['[', ']'], "");
    let mut parts = unquoted.rsplitn(3, '.');

    let name = parts.next().unwrap_or_default().trim().to_string();
    let schema = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    (schema, name)
}

impl QualifiedTableName {
    pub fn parse(raw_name: &str, default_schema: &str) -> Self {
        let (schema, name) = split_table_name(raw_name);

        match schema {
            Some(schema) if !schema.eq_ignore_ascii_case(default_schema) => Self {
                full_name: format!("{schema}.{name}"),
                schema_name: schema,
                name,
            },
            Some(schema) => Self {
                full_name: name.clone(),
                schema_name: schema,
                name,
            },
            None => Self {
                full_name: name.clone(),
                schema_name: default_schema.to_string(),
                name,
            },
        }
    }

    /// Identifiers are case-insensitive, so is the cache key
    pub fn cache_key(&self) -> String {
        format!("{}.{}", self.schema_name, self.name).to_uppercase()
    }

    /// Same (owner, name) pair, ignoring case
    pub fn same_table(&self, other: &Self) -> bool {
        self.schema_name.eq_ignore_ascii_case(&other.schema_name)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

/// Whether two (possibly quoted, possibly qualified) references name the same table
pub fn compare_table_names(name1: &str, name2: &str, default_schema: &str) -> bool {
    QualifiedTableName::parse(name1, default_schema)
        .same_table(&QualifiedTableName::parse(name2, default_schema))
}

/// The engine lets different owners create tables with the same name. An
/// unqualified reference is only safe when exactly one of them exists.
pub async fn count_owners(
    executor: &dyn QueryExecutor,
    name: &str,
) -> Result<i64, ExecutorError> {
    let count = executor
        .fetch_scalar(OWNER_COUNT_QUERY, &[("tableName", name)])
        .await?;

    let owners = count.as_i64().ok_or_else(|| ExecutorError::UnexpectedRows {
        reason: format!("owner count for {name:?} is not a number: {count}"),
    })?;
    debug!("Table {name:?} has {owners} owner(s)");

    Ok(owners)
}
