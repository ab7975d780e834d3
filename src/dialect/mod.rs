use std::fmt::Debug;

use crate::data_types::{AbstractType, DefaultValue};
use crate::schema::TableDescriptor;

pub mod ddl;
pub mod pagination;
pub mod quote;
pub mod types;

pub use pagination::{OrderBy, SortDirection};
pub use types::PhysicalType;

/// Everything engine-specific about turning portable fragments into SQL and
/// interpreting the catalog's type names. The schema loader and the context only
/// talk to the engine's syntax through this trait.
pub trait Dialect: Send + Sync + Debug {
    /// Quote a single name part, no `.` splitting
    fn quote_identifier(&self, name: &str) -> String;

    fn quote_table_name(&self, name: &str) -> String;

    fn quote_column_name(&self, name: &str) -> String;

    fn parse_column_type(&self, db_type: &str) -> (PhysicalType, AbstractType);

    fn cast_default(&self, abstract_type: AbstractType, raw: &str) -> Option<DefaultValue>;

    fn is_auto_increment_default(&self, raw: &str) -> bool;

    fn denotes_current_timestamp(&self, raw: &str) -> bool;

    fn physical_type(&self, spec: &str) -> String;

    fn apply_order_limit_offset(
        &self,
        sql: &str,
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> String;

    fn exists_wrapper(&self, raw_sql: &str) -> String;

    fn rename_table(&self, table: &str, new_name: &str) -> String;

    fn rename_column(&self, table: &str, name: &str, new_name: &str) -> String;

    fn alter_column(&self, table: &str, column: &str, column_type: &str) -> String;

    /// `None` when the table has no identity column or sequence
    fn reset_sequence(&self, table: &TableDescriptor, next_value: i64) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SqlAnywhereDialect {}

impl Dialect for SqlAnywhereDialect {
    fn quote_identifier(&self, name: &str) -> String {
        quote::quote_simple_table_name(name)
    }

    fn quote_table_name(&self, name: &str) -> String {
        quote::quote_table_name(name)
    }

    fn quote_column_name(&self, name: &str) -> String {
        quote::quote_column_name(name)
    }

    fn parse_column_type(&self, db_type: &str) -> (PhysicalType, AbstractType) {
        let physical = types::parse_physical(db_type);
        let abstract_type = types::abstract_type_of(&physical);
        (physical, abstract_type)
    }

    fn cast_default(&self, abstract_type: AbstractType, raw: &str) -> Option<DefaultValue> {
        types::cast_default(abstract_type, raw)
    }

    fn is_auto_increment_default(&self, raw: &str) -> bool {
        types::is_auto_increment_default(raw)
    }

    fn denotes_current_timestamp(&self, raw: &str) -> bool {
        types::denotes_current_timestamp(raw)
    }

    fn physical_type(&self, spec: &str) -> String {
        types::to_physical(spec)
    }

    fn apply_order_limit_offset(
        &self,
        sql: &str,
        order_by: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> String {
        pagination::apply_order_limit_offset(sql, order_by, limit, offset)
    }

    fn exists_wrapper(&self, raw_sql: &str) -> String {
        pagination::exists_wrapper(raw_sql)
    }

    fn rename_table(&self, table: &str, new_name: &str) -> String {
        ddl::rename_table(table, new_name)
    }

    fn rename_column(&self, table: &str, name: &str, new_name: &str) -> String {
        ddl::rename_column(table, name, new_name)
    }

    fn alter_column(&self, table: &str, column: &str, column_type: &str) -> String {
        ddl::alter_column(table, column, column_type)
    }

    fn reset_sequence(&self, table: &TableDescriptor, next_value: i64) -> Option<String> {
        ddl::reset_sequence(table, next_value)
    }
}
