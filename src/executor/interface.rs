use std::fmt::{self, Debug};

use async_trait::async_trait;

/// A single value of a catalog result row
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CatalogValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CatalogValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CatalogValue::Integer(i) => Some(*i),
            CatalogValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            CatalogValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            CatalogValue::Null => None,
            CatalogValue::Integer(i) => Some(i.to_string()),
            CatalogValue::Float(f) => Some(f.to_string()),
            CatalogValue::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for CatalogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogValue::Null => write!(f, "NULL"),
            CatalogValue::Integer(i) => write!(f, "{i}"),
            CatalogValue::Float(v) => write!(f, "{v}"),
            CatalogValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(val: &str) -> Self {
        CatalogValue::Text(val.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(val: String) -> Self {
        CatalogValue::Text(val)
    }
}

impl From<i64> for CatalogValue {
    fn from(val: i64) -> Self {
        CatalogValue::Integer(val)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(val: Option<T>) -> Self {
        val.map(Into::into).unwrap_or(CatalogValue::Null)
    }
}

/// One row returned by a catalog query. Column lookups are case-insensitive, since
/// the engine doesn't preserve the case of aliases consistently across versions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogRow {
    values: Vec<(String, CatalogValue)>,
}

impl CatalogRow {
    pub fn new(values: Vec<(String, CatalogValue)>) -> Self {
        Self { values }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CatalogValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&CatalogValue> {
        self.values
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    pub fn first(&self) -> Option<&CatalogValue> {
        self.values.first().map(|(_, value)| value)
    }

    /// Replace the value of a column, appending it when missing
    pub fn set(&mut self, column: &str, value: impl Into<CatalogValue>) {
        let value = value.into();
        match self
            .values
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
        {
            Some((_, existing)) => *existing = value,
            None => self.values.push((column.to_string(), value)),
        }
    }

    fn require(&self, column: &str) -> Result<&CatalogValue> {
        self.get(column).ok_or_else(|| Error::MalformedRow {
            reason: format!("column {column:?} missing from catalog row"),
        })
    }

    /// A non-null text value
    pub fn text(&self, column: &str) -> Result<String> {
        self.opt_text(column)?.ok_or_else(|| Error::MalformedRow {
            reason: format!("column {column:?} is NULL"),
        })
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>> {
        Ok(self.require(column)?.as_text())
    }

    pub fn int(&self, column: &str) -> Result<i64> {
        self.opt_int(column)?.ok_or_else(|| Error::MalformedRow {
            reason: format!("column {column:?} is not an integer"),
        })
    }

    pub fn opt_int(&self, column: &str) -> Result<Option<i64>> {
        let value = self.require(column)?;
        if value.is_null() {
            return Ok(None);
        }
        value.as_i64().map(Some).ok_or_else(|| Error::MalformedRow {
            reason: format!("column {column:?} holds non-integer value {value}"),
        })
    }
}

/// A named query parameter, e.g. `("tableName", "Users")` for `:tableName`
pub type QueryParam<'a> = (&'a str, &'a str);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Internal SQL error: {0:?}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Query parameter :{name} is not bound")]
    UnboundParameter { name: String },

    #[error("Unexpected query result: {reason}")]
    UnexpectedRows { reason: String },

    #[error("Malformed catalog row: {reason}")]
    MalformedRow { reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The only capability the schema engine needs from a connection: run a
/// parameterized statement and hand back its rows.
#[async_trait]
pub trait QueryExecutor: Send + Sync + Debug {
    async fn fetch_all(
        &self,
        sql: &str,
        params: &[QueryParam<'_>],
    ) -> Result<Vec<CatalogRow>, Error>;

    /// First column of the first row
    async fn fetch_scalar(
        &self,
        sql: &str,
        params: &[QueryParam<'_>],
    ) -> Result<CatalogValue, Error> {
        let rows = self.fetch_all(sql, params).await?;
        rows.first()
            .and_then(|row| row.first())
            .cloned()
            .ok_or_else(|| Error::UnexpectedRows {
                reason: "scalar query returned no rows".to_string(),
            })
    }
}
