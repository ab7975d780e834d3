//! LIMIT/OFFSET translation into `TOP n START AT m`.
//!
//! This is a text transform, not a parser: the clause is only inserted after the
//! statement's leading `SELECT [DISTINCT]`, which may be preceded by whitespace,
//! opening parentheses and comments. Statements that don't start that way
//! (e.g. `WITH ...`) are returned untouched, as are statements whose leading
//! `SELECT` already carries a `TOP`.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use super::quote::quote_column_name;

lazy_static! {
    static ref LEADING_SELECT: Regex =
        Regex::new(r"(?is)^(?:\s|\(|--[^\n]*(?:\n|$)|/\*.*?\*/)*SELECT\b(?:\s+DISTINCT\b)?")
            .unwrap();
    static ref EXISTING_TOP: Regex = Regex::new(r"(?i)^\s*TOP\b").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY item as produced by the query builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    Column {
        name: String,
        direction: SortDirection,
    },
    // Rendered verbatim
    Expression(String),
}

impl OrderBy {
    pub fn asc(name: &str) -> Self {
        OrderBy::Column {
            name: name.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(name: &str) -> Self {
        OrderBy::Column {
            name: name.to_string(),
            direction: SortDirection::Desc,
        }
    }

    fn to_sql(&self) -> String {
        match self {
            OrderBy::Column {
                name,
                direction: SortDirection::Asc,
            } => quote_column_name(name),
            OrderBy::Column {
                name,
                direction: SortDirection::Desc,
            } => format!("{} DESC", quote_column_name(name)),
            OrderBy::Expression(expr) => expr.clone(),
        }
    }
}

/// `ORDER BY ...`, or an empty string when there is nothing to order by
pub fn build_order_by(order_by: &[OrderBy]) -> String {
    if order_by.is_empty() {
        return String::new();
    }
    format!("ORDER BY {}", order_by.iter().map(OrderBy::to_sql).join(", "))
}

/// Insert `TOP`/`START AT` after the leading `SELECT [DISTINCT]`. `START AT` is a
/// 1-based row position, so the offset is shifted by one. An offset of zero is no
/// offset at all.
pub fn build_top(sql: &str, limit: Option<u64>, offset: Option<u64>) -> String {
    let offset = offset.filter(|o| *o > 0);

    let clause = match (limit, offset) {
        (None, None) => return sql.to_string(),
        (Some(limit), None) => format!(" TOP {limit}"),
        (Some(limit), Some(offset)) => {
            format!(" TOP {limit} START AT {}", offset.saturating_add(1))
        }
        (None, Some(offset)) => format!(" TOP ALL START AT {}", offset.saturating_add(1)),
    };

    let Some(select) = LEADING_SELECT.find(sql) else {
        return sql.to_string();
    };

    let (head, tail) = sql.split_at(select.end());
    if EXISTING_TOP.is_match(tail) {
        return sql.to_string();
    }

    format!("{head}{clause}{tail}")
}

pub fn apply_order_limit_offset(
    sql: &str,
    order_by: &[OrderBy],
    limit: Option<u64>,
    offset: Option<u64>,
) -> String {
    let mut sql = sql.to_string();

    let order_by = build_order_by(order_by);
    if !order_by.is_empty() {
        sql.push(' ');
        sql.push_str(&order_by);
    }

    build_top(&sql, limit, offset)
}

/// The engine has no boolean `EXISTS` expression in the select list
pub fn exists_wrapper(raw_sql: &str) -> String {
    format!("SELECT IF EXISTS({raw_sql}) THEN 1 ELSE 0 ENDIF")
}
