use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Portable column type names, independent of the engine's physical type vocabulary.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AbstractType {
    Pk,
    UPk,
    BigPk,
    UBigPk,
    Char,
    Varchar,
    String,
    Text,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    DateTime,
    Timestamp,
    Time,
    Date,
    Binary,
    Boolean,
    Money,
}

impl AbstractType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            AbstractType::Pk
                | AbstractType::UPk
                | AbstractType::BigPk
                | AbstractType::UBigPk
                | AbstractType::TinyInt
                | AbstractType::SmallInt
                | AbstractType::Integer
                | AbstractType::BigInt
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, AbstractType::Float | AbstractType::Double)
    }

    /// Types whose empty-string default is a real value rather than "no default"
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            AbstractType::Char
                | AbstractType::Varchar
                | AbstractType::String
                | AbstractType::Text
                | AbstractType::Binary
        )
    }
}

/// A column default, cast to the column's abstract type.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    // Server-side expression that isn't a literal of the column type
    Expression(String),
}
