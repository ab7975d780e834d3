//! Schema introspection: reading table metadata out of the engine's `SYS.*`
//! catalog, whose layout depends on the server release.

use crate::executor::Error as ExecutorError;

pub mod foreign_keys;
pub mod loader;
pub mod names;
pub mod queries;
pub mod version;

pub use loader::SchemaLoader;
pub use names::{compare_table_names, QualifiedTableName};
pub use version::{ServerVersionFamily, VersionProbe};

/// Owner of unqualified names when neither a schema nor a user is configured
pub const DEFAULT_SCHEMA: &str = "dbo";

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Server version {version:?} is not supported")]
    UnsupportedVersion { version: String },

    #[error("Table name {name:?} is owned by {owners} users, qualify it with the owner")]
    AmbiguousTableName { name: String, owners: i64 },

    #[error("Catalog query for table {table:?} failed: {source}")]
    Query {
        table: String,
        #[source]
        source: ExecutorError,
    },

    #[error("Malformed catalog row for table {table:?}: {reason}")]
    MalformedRow { table: String, reason: String },

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl SchemaError {
    /// Attach the table being loaded to an executor failure
    pub(crate) fn for_table(table: &QualifiedTableName, error: ExecutorError) -> Self {
        match error {
            ExecutorError::MalformedRow { reason } => Self::MalformedRow {
                table: table.full_name.clone(),
                reason,
            },
            source => Self::Query {
                table: table.full_name.clone(),
                source,
            },
        }
    }
}

pub type CatalogResult<T, E = SchemaError> = Result<T, E>;
