use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::catalog::names::split_table_name;
use crate::catalog::{
    compare_table_names, CatalogResult, QualifiedTableName, SchemaError, SchemaLoader,
    ServerVersionFamily, VersionProbe,
};
use crate::dialect::{Dialect, OrderBy, SqlAnywhereDialect};
use crate::executor::QueryExecutor;
use crate::schema::TableDescriptor;

pub const DEFAULT_MAX_TABLES: u64 = 1024;

/// One logical connection's view of the server: its version family, the table
/// descriptors loaded so far and the dialect used to render SQL for it.
pub struct DialectContext {
    pub executor: Arc<dyn QueryExecutor>,
    pub dialect: Arc<dyn Dialect>,
    pub default_schema: String,
    version: VersionProbe,
    // `None` caches the absence of a table
    tables: Cache<String, Option<Arc<TableDescriptor>>>,
}

impl DialectContext {
    pub fn new(executor: Arc<dyn QueryExecutor>, default_schema: &str) -> Self {
        Self {
            executor,
            dialect: Arc::new(SqlAnywhereDialect {}),
            default_schema: default_schema.to_string(),
            version: VersionProbe::new(),
            tables: Cache::new(DEFAULT_MAX_TABLES),
        }
    }

    /// Pin the server major version instead of probing it
    pub fn with_server_version(mut self, major: u32) -> CatalogResult<Self> {
        self.version = VersionProbe::with_override(major)?;
        Ok(self)
    }

    pub fn with_max_tables(mut self, max_tables: u64) -> Self {
        self.tables = Cache::new(max_tables);
        self
    }

    pub async fn server_version(&self) -> CatalogResult<ServerVersionFamily> {
        self.version.resolve(self.executor.as_ref()).await
    }

    // A bare name is cached apart from its qualified form, since only the bare
    // one is checked for ambiguity.
    fn cache_key(&self, raw_name: &str) -> String {
        match split_table_name(raw_name) {
            (None, name) => name.to_uppercase(),
            (Some(_), _) => {
                QualifiedTableName::parse(raw_name, &self.default_schema).cache_key()
            }
        }
    }

    /// Descriptor of a table, loaded from the catalog on first use.
    /// `Ok(None)` if the table doesn't exist.
    pub async fn load_table_schema(
        &self,
        name: &str,
    ) -> CatalogResult<Option<Arc<TableDescriptor>>> {
        let key = self.cache_key(name);
        if let Some(table) = self.tables.get(&key).await {
            return Ok(table);
        }

        let family = self.server_version().await?;
        let loader = SchemaLoader::new(
            self.executor.as_ref(),
            self.dialect.as_ref(),
            family.queries(),
            &self.default_schema,
        );

        let table = loader.load(name).await?.map(Arc::new);
        if table.is_none() {
            debug!("Table {name:?} not found");
        }

        self.tables.insert(key, table.clone()).await;
        Ok(table)
    }

    /// Drop a table's cached descriptor and load it again
    pub async fn refresh_table_schema(
        &self,
        name: &str,
    ) -> CatalogResult<Option<Arc<TableDescriptor>>> {
        self.invalidate_table(name).await;
        self.load_table_schema(name).await
    }

    pub async fn invalidate_table(&self, name: &str) {
        let qualified = QualifiedTableName::parse(name, &self.default_schema);
        self.tables.invalidate(&qualified.cache_key()).await;

        if qualified
            .schema_name
            .eq_ignore_ascii_case(&self.default_schema)
        {
            self.tables.invalidate(&qualified.name.to_uppercase()).await;
        }
    }

    /// Forget every descriptor and the server version
    pub fn invalidate_all(&self) {
        self.tables.invalidate_all();
        self.version.invalidate();
        info!("Dropped all cached table descriptors");
    }

    /// Bare names of the tables and views owned by `schema` (the default
    /// schema when empty)
    pub async fn table_names(&self, schema: &str) -> CatalogResult<Vec<String>> {
        let family = self.server_version().await?;
        SchemaLoader::new(
            self.executor.as_ref(),
            self.dialect.as_ref(),
            family.queries(),
            &self.default_schema,
        )
        .table_names(schema)
        .await
    }

    pub fn translate_pagination(
        &self,
        sql: &str,
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> String {
        self.dialect
            .apply_order_limit_offset(sql, order_by, limit, offset)
    }

    pub fn exists_wrapper(&self, raw_sql: &str) -> String {
        self.dialect.exists_wrapper(raw_sql)
    }

    pub fn quote_identifier(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    pub fn quote_table_name(&self, name: &str) -> String {
        self.dialect.quote_table_name(name)
    }

    pub fn quote_column_name(&self, name: &str) -> String {
        self.dialect.quote_column_name(name)
    }

    pub fn compare_table_names(&self, name1: &str, name2: &str) -> bool {
        compare_table_names(name1, name2, &self.default_schema)
    }

    pub fn rename_table(&self, table: &str, new_name: &str) -> String {
        self.dialect.rename_table(table, new_name)
    }

    pub fn rename_column(&self, table: &str, name: &str, new_name: &str) -> String {
        self.dialect.rename_column(table, name, new_name)
    }

    pub fn alter_column(&self, table: &str, column: &str, column_type: &str) -> String {
        self.dialect.alter_column(table, column, column_type)
    }

    /// Statement restarting a table's identity or sequence so the next row gets `next_value`.
    /// Without a value, the next value after the current maximum key is used.
    /// `None` if the table doesn't exist or has neither.
    pub async fn reset_sequence(
        &self,
        table_name: &str,
        next_value: Option<i64>,
    ) -> CatalogResult<Option<String>> {
        let Some(table) = self.load_table_schema(table_name).await? else {
            warn!("Can't reset the sequence of unknown table {table_name:?}");
            return Ok(None);
        };
        if table.sequence_name.is_none() {
            return Ok(None);
        }

        let next_value = match (next_value, table.primary_key.as_slice()) {
            (Some(value), _) => value,
            (None, [primary_key]) => {
                let sql = format!(
                    "SELECT MAX({}) FROM {}",
                    self.quote_column_name(primary_key),
                    self.quote_table_name(&format!(
                        "{}.{}",
                        table.name.schema_name, table.name.name
                    ))
                );
                let max = self
                    .executor
                    .fetch_scalar(&sql, &[])
                    .await
                    .map_err(|e| SchemaError::for_table(&table.name, e))?;
                max.as_i64().unwrap_or(0) + 1
            }
            (None, _) => 1,
        };

        Ok(self.dialect.reset_sequence(&table, next_value))
    }
}
