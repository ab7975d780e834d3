use indexmap::IndexMap;

use crate::catalog::names::QualifiedTableName;
use crate::data_types::{AbstractType, DefaultValue};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Physical type as reported by the catalog
    pub db_type: String,
    pub abstract_type: AbstractType,
    pub size: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub allow_null: bool,
    /// Whether the column is the sole member of a unique index
    pub unique: bool,
    /// Filled in once the table's primary key is known; a loaded table never
    /// hands out `None` here.
    pub is_primary_key: Option<bool>,
    pub auto_increment: bool,
    pub unsigned: bool,
    pub default_raw: Option<String>,
    pub default_value: Option<DefaultValue>,
    /// Sequence backing the column default, if any
    pub sequence_name: Option<String>,
    pub comment: Option<String>,
}

impl ColumnDescriptor {
    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key.unwrap_or(false)
    }
}

/// A foreign key of the loaded table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDescriptor {
    pub referenced_table: String,
    /// (local column, referenced column), in the key's declared order
    pub columns: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    pub name: QualifiedTableName,
    pub primary_key: Vec<String>,
    /// Columns in catalog `column_id` order
    pub columns: IndexMap<String, ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    /// `Some("")` for an identity primary key without a named sequence
    pub sequence_name: Option<String>,
}

impl TableDescriptor {
    pub(crate) fn new(name: QualifiedTableName) -> Self {
        Self {
            name,
            primary_key: vec![],
            columns: IndexMap::new(),
            foreign_keys: vec![],
            sequence_name: None,
        }
    }

    /// Case-insensitive column lookup
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.get(name).or_else(|| {
            self.columns
                .iter()
                .find(|(column, _)| column.eq_ignore_ascii_case(name))
                .map(|(_, descriptor)| descriptor)
        })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }
}
