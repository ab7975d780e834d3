use indexmap::IndexMap;
use itertools::{EitherOrBoth, Itertools};

use crate::executor::{CatalogRow, Error as ExecutorError};
use crate::schema::ForeignKeyDescriptor;

/// How a catalog query lays out the columns of one foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyLayout {
    /// One row per key, local and referenced columns as comma-separated lists
    ColumnLists,
    /// One row per key column
    RowPerColumn,
}

fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

fn column_pairs(
    row: &CatalogRow,
    layout: ForeignKeyLayout,
) -> Result<Vec<(String, String)>, ExecutorError> {
    let local = row.text("FK_COLUMN_NAME")?;
    let referenced = row.text("UQ_COLUMN_NAME")?;

    match layout {
        ForeignKeyLayout::RowPerColumn => Ok(vec![(
            local.trim().to_string(),
            referenced.trim().to_string(),
        )]),
        ForeignKeyLayout::ColumnLists => split_list(&local)
            .zip_longest(split_list(&referenced))
            .map(|pair| match pair {
                EitherOrBoth::Both(local, referenced) => Ok((local, referenced)),
                _ => Err(ExecutorError::MalformedRow {
                    reason: format!(
                        "foreign key column lists {local:?} and {referenced:?} differ in length"
                    ),
                }),
            })
            .collect(),
    }
}

/// Assemble foreign keys from catalog rows. Rows are grouped by key identity
/// (the key id and the referenced table) in the order they were first seen, so
/// a key split over several rows still comes out as one descriptor. Rows
/// without a referenced table belong to indexes that aren't foreign keys.
pub fn resolve_foreign_keys(
    rows: &[CatalogRow],
    layout: ForeignKeyLayout,
) -> Result<Vec<ForeignKeyDescriptor>, ExecutorError> {
    let mut keys: IndexMap<(Option<String>, String), ForeignKeyDescriptor> = IndexMap::new();

    for row in rows {
        let Some(referenced_table) = row.opt_text("UQ_TABLE_NAME")? else {
            continue;
        };
        let referenced_table = referenced_table.trim().to_string();
        let key_id = row.get("foreign_key_id").and_then(|id| id.as_text());

        let key = keys
            .entry((key_id, referenced_table.clone()))
            .or_insert_with(|| ForeignKeyDescriptor {
                referenced_table,
                columns: vec![],
            });

        for pair in column_pairs(row, layout)? {
            if !key.columns.contains(&pair) {
                key.columns.push(pair);
            }
        }
    }

    Ok(keys.into_values().collect())
}
