use tracing::debug;

use super::foreign_keys::resolve_foreign_keys;
use super::names::{count_owners, split_table_name, QualifiedTableName};
use super::queries::CatalogQueries;
use super::{CatalogResult, SchemaError};
use crate::data_types::AbstractType;
use crate::dialect::Dialect;
use crate::executor::{CatalogRow, Error as ExecutorError, QueryExecutor, QueryParam};
use crate::schema::{ColumnDescriptor, ForeignKeyDescriptor, TableDescriptor};

/// A column as read from the catalog, before the table's primary key is known.
/// It can only become a [`ColumnDescriptor`] through [`CatalogColumn::resolve`].
#[derive(Debug)]
struct CatalogColumn {
    name: String,
    db_type: String,
    width: Option<i64>,
    scale: Option<i64>,
    allow_null: bool,
    unique: bool,
    default_raw: Option<String>,
    sequence_name: Option<String>,
    comment: Option<String>,
}

fn is_flag_set(row: &CatalogRow, column: &str) -> Result<bool, ExecutorError> {
    Ok(row
        .opt_text(column)?
        .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("Y")))
}

impl CatalogColumn {
    fn from_row(row: &CatalogRow) -> Result<Self, ExecutorError> {
        let default_raw = row
            .opt_text("default")?
            .filter(|raw| !raw.trim().eq_ignore_ascii_case("(NULL)"));

        Ok(Self {
            name: row.text("column_name")?.trim().to_string(),
            db_type: row.text("base_type")?.trim().to_string(),
            width: row.opt_int("width")?,
            scale: row.opt_int("scale")?,
            allow_null: is_flag_set(row, "nulls")?,
            unique: is_flag_set(row, "unique")?,
            default_raw,
            sequence_name: row
                .opt_text("sequence_name")?
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            comment: row.opt_text("remarks")?,
        })
    }

    fn resolve(self, primary_key: &[String], dialect: &dyn Dialect) -> ColumnDescriptor {
        let (physical, abstract_type) = dialect.parse_column_type(&self.db_type);

        let is_primary_key = primary_key
            .iter()
            .any(|pk| pk.eq_ignore_ascii_case(&self.name));
        let auto_increment = self.sequence_name.is_some()
            || self
                .default_raw
                .as_deref()
                .is_some_and(|raw| dialect.is_auto_increment_default(raw));

        let default_value = match self.default_raw.as_deref() {
            None => None,
            Some(_) if auto_increment || is_primary_key => None,
            Some(raw)
                if matches!(abstract_type, AbstractType::Timestamp | AbstractType::DateTime)
                    && dialect.denotes_current_timestamp(raw) =>
            {
                None
            }
            Some(raw) => dialect.cast_default(abstract_type, raw),
        };

        let precision = physical.precision().or(match abstract_type {
            AbstractType::Decimal | AbstractType::Money => self.width,
            _ => None,
        });

        ColumnDescriptor {
            size: physical.size.or(self.width),
            precision,
            scale: physical.scale.or(self.scale),
            unsigned: physical.unsigned,
            name: self.name,
            db_type: self.db_type,
            abstract_type,
            allow_null: self.allow_null,
            unique: self.unique,
            is_primary_key: Some(is_primary_key),
            auto_increment,
            default_raw: self.default_raw,
            default_value,
            sequence_name: self.sequence_name,
            comment: self.comment,
        }
    }
}

/// Builds [`TableDescriptor`]s from the catalog of one server version family.
/// Each stage's query is awaited before the next one is issued.
pub struct SchemaLoader<'a> {
    executor: &'a dyn QueryExecutor,
    dialect: &'a dyn Dialect,
    queries: &'static CatalogQueries,
    default_schema: &'a str,
}

impl<'a> SchemaLoader<'a> {
    pub fn new(
        executor: &'a dyn QueryExecutor,
        dialect: &'a dyn Dialect,
        queries: &'static CatalogQueries,
        default_schema: &'a str,
    ) -> Self {
        Self {
            executor,
            dialect,
            queries,
            default_schema,
        }
    }

    /// Load the descriptor of a table. `Ok(None)` means the table doesn't exist
    /// (or its columns couldn't be read).
    pub async fn load(&self, raw_name: &str) -> CatalogResult<Option<TableDescriptor>> {
        let name = QualifiedTableName::parse(raw_name, self.default_schema);

        // Only a bare name can resolve to more than one owner
        if split_table_name(raw_name).0.is_none() {
            let owners = count_owners(self.executor, &name.name)
                .await
                .map_err(|e| SchemaError::for_table(&name, e))?;
            if owners > 1 {
                return Err(SchemaError::AmbiguousTableName {
                    name: name.name,
                    owners,
                });
            }
        }

        let (table_name, schema_name) = (name.name.clone(), name.schema_name.clone());
        let params = [
            ("tableName", table_name.as_str()),
            ("schemaName", schema_name.as_str()),
        ];

        let primary_key = self
            .load_primary_keys(&params)
            .await
            .map_err(|e| SchemaError::for_table(&name, e))?;

        let columns = match self.load_columns(&params, &primary_key).await {
            Ok(columns) if columns.is_empty() => {
                debug!("No columns found for table {:?}", name.full_name);
                return Ok(None);
            }
            Ok(columns) => columns,
            Err(e) => {
                debug!("Couldn't load the columns of table {:?}: {e}", name.full_name);
                return Ok(None);
            }
        };

        let mut table = TableDescriptor::new(name);
        table.primary_key = primary_key;
        for column in columns {
            if column.is_primary_key() && column.auto_increment {
                table.sequence_name = Some(column.sequence_name.clone().unwrap_or_default());
            }
            table.columns.insert(column.name.clone(), column);
        }

        table.foreign_keys = self
            .load_foreign_keys(&params)
            .await
            .map_err(|e| SchemaError::for_table(&table.name, e))?;

        debug!(
            "Loaded table {:?}: {} column(s), {} foreign key(s)",
            table.name.full_name,
            table.columns.len(),
            table.foreign_keys.len()
        );
        Ok(Some(table))
    }

    async fn load_primary_keys(
        &self,
        params: &[QueryParam<'_>],
    ) -> Result<Vec<String>, ExecutorError> {
        self.executor
            .fetch_all(self.queries.primary_keys, params)
            .await?
            .iter()
            .map(|row| row.text("field_name").map(|name| name.trim().to_string()))
            .collect()
    }

    async fn load_columns(
        &self,
        params: &[QueryParam<'_>],
        primary_key: &[String],
    ) -> Result<Vec<ColumnDescriptor>, ExecutorError> {
        self.executor
            .fetch_all(self.queries.columns, params)
            .await?
            .iter()
            .map(|row| {
                CatalogColumn::from_row(row).map(|column| column.resolve(primary_key, self.dialect))
            })
            .collect()
    }

    async fn load_foreign_keys(
        &self,
        params: &[QueryParam<'_>],
    ) -> Result<Vec<ForeignKeyDescriptor>, ExecutorError> {
        let rows = self
            .executor
            .fetch_all(self.queries.foreign_keys, params)
            .await?;
        resolve_foreign_keys(&rows, self.queries.foreign_key_layout)
    }

    /// Bare names of the base tables and views owned by `schema`
    /// (the default schema when empty)
    pub async fn table_names(&self, schema: &str) -> CatalogResult<Vec<String>> {
        let schema = match schema.trim() {
            "" => self.default_schema,
            schema => schema,
        };

        let rows = self
            .executor
            .fetch_all(self.queries.table_names, &[("schemaName", schema)])
            .await?;
        let names = rows
            .iter()
            .map(|row| row.text("table_name").map(|name| name.trim().to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Schema {schema:?} has {} table(s)", names.len());
        Ok(names)
    }
}
