//! Fixed maintenance statements. Nothing here touches the catalog.

use super::quote::{quote_column_name, quote_table_name, unquote_simple_name};
use super::types::to_physical;
use crate::schema::TableDescriptor;

pub fn rename_table(table: &str, new_name: &str) -> String {
    format!(
        "ALTER TABLE {} RENAME {}",
        quote_table_name(table),
        quote_table_name(new_name)
    )
}

pub fn rename_column(table: &str, name: &str, new_name: &str) -> String {
    format!(
        "ALTER TABLE {} RENAME {} TO {}",
        quote_table_name(table),
        quote_column_name(name),
        quote_column_name(new_name)
    )
}

/// `column_type` may be an abstract type spec (`string(64) NOT NULL`); it is
/// translated to the physical type, anything else is kept as given.
pub fn alter_column(table: &str, column: &str, column_type: &str) -> String {
    format!(
        "ALTER TABLE {} MODIFY {} {}",
        quote_table_name(table),
        quote_column_name(column),
        to_physical(column_type)
    )
}

fn string_literal(value: &str) -> String {
    format!("'{}'", unquote_simple_name(value).replace('\'', "''"))
}

/// Restart the key generator so that the next inserted row gets `next_value`.
/// An empty sequence name stands for the table's identity counter, which
/// `sa_reset_identity` sets to the last used value. Tables without either
/// have nothing to reset.
pub fn reset_sequence(table: &TableDescriptor, next_value: i64) -> Option<String> {
    match table.sequence_name.as_deref()? {
        "" => Some(format!(
            "CALL sa_reset_identity({}, {}, {})",
            string_literal(&table.name.name),
            string_literal(&table.name.schema_name),
            next_value.saturating_sub(1)
        )),
        sequence => Some(format!(
            "ALTER SEQUENCE {} RESTART WITH {next_value}",
            quote_table_name(sequence)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::names::QualifiedTableName;

    #[test]
    fn test_rename_table() {
        assert_eq!(
            rename_table("dbo.Users", "Customers"),
            "ALTER TABLE [dbo].[Users] RENAME [Customers]"
        );
    }

    #[test]
    fn test_rename_column() {
        assert_eq!(
            rename_column("Users", "name", "[full_name]"),
            "ALTER TABLE [Users] RENAME [name] TO [full_name]"
        );
    }

    #[test]
    fn test_alter_column() {
        assert_eq!(
            alter_column("Users", "name", "string(64) NOT NULL"),
            "ALTER TABLE [Users] MODIFY [name] nvarchar(64) NOT NULL"
        );
        assert_eq!(
            alter_column("Users", "age", "unsigned smallint"),
            "ALTER TABLE [Users] MODIFY [age] unsigned smallint"
        );
    }

    #[test]
    fn test_reset_sequence() {
        let mut table = TableDescriptor::new(QualifiedTableName {
            schema_name: "dbo".to_string(),
            name: "O'Brien".to_string(),
            full_name: "O'Brien".to_string(),
        });
        assert_eq!(reset_sequence(&table, 10), None);

        table.sequence_name = Some(String::new());
        assert_eq!(
            reset_sequence(&table, 10).unwrap(),
            "CALL sa_reset_identity('O''Brien', 'dbo', 9)"
        );

        table.sequence_name = Some("order_ids".to_string());
        assert_eq!(
            reset_sequence(&table, 10).unwrap(),
            "ALTER SEQUENCE [order_ids] RESTART WITH 10"
        );
    }
}
