//! Identifier quoting for the engine's `[bracket]` convention.

/// Quote a table name without a schema prefix. Names that already carry a
/// bracket are assumed to be quoted.
pub fn quote_simple_table_name(name: &str) -> String {
    if name.contains('[') {
        name.to_string()
    } else {
        format!("[{name}]")
    }
}

/// Like [`quote_simple_table_name`], but `*` is left alone
pub fn quote_simple_column_name(name: &str) -> String {
    if name.contains('[') || name == "*" {
        name.to_string()
    } else {
        format!("[{name}]")
    }
}

/// Quote a possibly schema-qualified table name, part by part.
/// Expressions (anything containing a parenthesis) are passed through.
pub fn quote_table_name(name: &str) -> String {
    if name.contains('(') {
        return name.to_string();
    }

    name.split('.')
        .map(quote_simple_table_name)
        .collect::<Vec<_>>()
        .join(".")
}

/// Quote a column name that may be prefixed with a (qualified) table name
pub fn quote_column_name(name: &str) -> String {
    if name.contains('(') {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((prefix, column)) => format!(
            "{}.{}",
            quote_table_name(prefix),
            quote_simple_column_name(column)
        ),
        None => quote_simple_column_name(name),
    }
}

pub fn unquote_simple_name(name: &str) -> String {
    name.replace(['[', ']'], "")
}
