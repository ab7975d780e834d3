//! Mapping between the engine's physical column types and [`AbstractType`].
//!
//! The engine reports a column's type as a domain name, sometimes with a
//! parenthesized size (`decimal(18,2)`, `bit(32)`). Older schemas use `bit(n)` as an
//! integer-like bit field, so the width feeds back into the abstract type.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use tracing::debug;

use crate::data_types::{AbstractType, DefaultValue};

lazy_static! {
    static ref PHYSICAL_TYPE: Regex = Regex::new(
        r"(?i)^\s*(?:unsigned\s+)?([a-z_][a-z0-9_]*(?:\s+[a-z_][a-z0-9_]*)*)\s*(?:\(([^)]*)\))?"
    )
    .unwrap();
    static ref SIZED_ABSTRACT_TYPE: Regex = Regex::new(r"^(\w+)\s*\((.+?)\)(.*)$").unwrap();
    static ref PREFIXED_ABSTRACT_TYPE: Regex = Regex::new(r"^(\w+)(\s+.*)$").unwrap();
    static ref SIZE_ARGUMENT: Regex = Regex::new(r"\(.+\)").unwrap();
}

/// A physical type string broken into its parts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhysicalType {
    /// Lowercased type name, e.g. `decimal` or `long varchar`
    pub base: String,
    pub size: Option<i64>,
    pub scale: Option<i64>,
    pub unsigned: bool,
}

impl PhysicalType {
    pub fn precision(&self) -> Option<i64> {
        self.size
    }
}

fn lookup(token: &str) -> Option<AbstractType> {
    let t = match token {
        // exact numbers
        "bigint" => AbstractType::BigInt,
        "numeric" | "decimal" => AbstractType::Decimal,
        "bit" | "smallint" | "tinyint" => AbstractType::SmallInt,
        "integer" | "int" => AbstractType::Integer,
        "money" | "smallmoney" => AbstractType::Money,
        // approximate numbers
        "float" | "real" => AbstractType::Float,
        "double" | "double precision" => AbstractType::Double,
        // date and time
        "date" => AbstractType::Date,
        "datetime" | "smalldatetime" => AbstractType::DateTime,
        "timestamp" => AbstractType::Timestamp,
        "time" => AbstractType::Time,
        // character strings
        "char" | "nchar" => AbstractType::Char,
        "varchar" => AbstractType::Varchar,
        "nvarchar" | "uniqueidentifier" | "uniqueidentifierstr" => AbstractType::String,
        "text" | "ntext" | "long varchar" | "long nvarchar" | "xml" => AbstractType::Text,
        // binary strings
        "binary" | "varbinary" | "long binary" | "image" => AbstractType::Binary,
        _ => return None,
    };
    Some(t)
}

fn normalize(token: &str) -> String {
    let token = token.trim().to_lowercase();
    let mut words = token.split_whitespace().peekable();
    if words.peek() == Some(&"unsigned") {
        words.next();
    }
    words.collect::<Vec<_>>().join(" ")
}

/// Abstract type for a bare physical type token. The full (possibly multi-word)
/// token is tried first, then its leading word; anything unknown is a string.
pub fn to_abstract(token: &str) -> AbstractType {
    let token = normalize(token);
    lookup(&token)
        .or_else(|| token.split(' ').next().and_then(lookup))
        .unwrap_or(AbstractType::String)
}

/// Split a physical type such as `decimal(18,2)` into name, size and scale.
/// A malformed size argument is ignored rather than failing the column.
pub fn parse_physical(db_type: &str) -> PhysicalType {
    let unsigned = db_type.to_lowercase().contains("unsigned");

    let Some(captures) = PHYSICAL_TYPE.captures(db_type) else {
        debug!("Unrecognized physical type {db_type:?}, treating it as a string");
        return PhysicalType {
            unsigned,
            ..Default::default()
        };
    };

    let mut physical = PhysicalType {
        base: normalize(&captures[1]),
        size: None,
        scale: None,
        unsigned,
    };

    if let Some(args) = captures.get(2) {
        let mut values = args.as_str().split(',').map(|v| v.trim().parse::<i64>());
        match values.next() {
            Some(Ok(size)) => {
                physical.size = Some(size);
                match values.next() {
                    Some(Ok(scale)) => physical.scale = Some(scale),
                    Some(Err(_)) => {
                        debug!("Ignoring malformed scale in physical type {db_type:?}")
                    }
                    None => {}
                }
            }
            _ => debug!("Ignoring malformed size in physical type {db_type:?}"),
        }
    }

    physical
}

/// Abstract type of a parsed physical type, including the bit-field refinements
pub fn abstract_type_of(physical: &PhysicalType) -> AbstractType {
    let abstract_type = to_abstract(&physical.base);
    let leading = physical.base.split(' ').next().unwrap_or_default();

    match (leading, physical.size) {
        ("tinyint" | "bit", Some(1)) => AbstractType::Boolean,
        ("bit", Some(size)) if size > 32 => AbstractType::BigInt,
        ("bit", Some(32)) => AbstractType::Integer,
        _ => abstract_type,
    }
}

pub fn is_auto_increment_default(raw: &str) -> bool {
    let raw = normalize(raw);
    raw.starts_with("autoincrement") || raw.starts_with("global autoincrement")
}

/// Whether a raw default makes the server stamp the current time
pub fn denotes_current_timestamp(raw: &str) -> bool {
    matches!(
        normalize(raw).as_str(),
        "current timestamp"
            | "current_timestamp"
            | "current_timestamp()"
            | "current utc timestamp"
            | "timestamp"
            | "utc timestamp"
            | "now()"
            | "getdate()"
    )
}

fn unquote_literal(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

/// Cast a raw catalog default to the column's type. `None` means no default.
pub fn cast_default(abstract_type: AbstractType, raw: &str) -> Option<DefaultValue> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("(null)") {
        return None;
    }
    if raw.is_empty() && !abstract_type.is_textual() {
        return None;
    }

    let literal = unquote_literal(raw);
    let value = literal.as_deref().unwrap_or(raw).trim();
    let expression = || DefaultValue::Expression(raw.to_string());

    let cast = if abstract_type.is_integer() {
        value
            .parse::<i64>()
            .map(DefaultValue::Integer)
            .unwrap_or_else(|_| expression())
    } else if abstract_type.is_float() {
        value
            .parse::<f64>()
            .map(DefaultValue::Float)
            .unwrap_or_else(|_| expression())
    } else {
        match abstract_type {
            AbstractType::Boolean => match value.to_lowercase().as_str() {
                "1" | "true" | "on" => DefaultValue::Boolean(true),
                "0" | "false" | "off" => DefaultValue::Boolean(false),
                _ => expression(),
            },
            AbstractType::Decimal | AbstractType::Money => {
                if value.parse::<f64>().is_ok() {
                    DefaultValue::String(value.to_string())
                } else {
                    expression()
                }
            }
            _ => match literal {
                Some(literal) => DefaultValue::String(literal),
                None if raw.is_empty() => DefaultValue::String(String::new()),
                None => expression(),
            },
        }
    };

    Some(cast)
}

fn physical_for(abstract_type: AbstractType) -> &'static str {
    match abstract_type {
        AbstractType::Pk | AbstractType::UPk => "int IDENTITY PRIMARY KEY",
        AbstractType::BigPk | AbstractType::UBigPk => "bigint IDENTITY PRIMARY KEY",
        AbstractType::Char => "nchar(1)",
        AbstractType::Varchar => "varchar(255)",
        AbstractType::String => "nvarchar(255)",
        AbstractType::Text => "nvarchar(32767)",
        AbstractType::TinyInt => "tinyint",
        AbstractType::SmallInt => "smallint",
        AbstractType::Integer => "int",
        AbstractType::BigInt => "bigint",
        AbstractType::Float | AbstractType::Double => "float",
        AbstractType::Decimal => "decimal(18,0)",
        AbstractType::DateTime => "datetime",
        AbstractType::Timestamp => "timestamp",
        AbstractType::Time => "time",
        AbstractType::Date => "date",
        AbstractType::Binary => "varbinary(32767)",
        AbstractType::Boolean => "bit",
        AbstractType::Money => "decimal(19,2)",
    }
}

/// Physical type for an abstract type specification such as `string(64) NOT NULL`.
/// Sizes replace the default size of the mapped type, trailing modifiers are kept
/// and anything that doesn't start with an abstract type is returned unchanged.
pub fn to_physical(spec: &str) -> String {
    if let Ok(abstract_type) = AbstractType::from_str(spec) {
        return physical_for(abstract_type).to_string();
    }

    if let Some(captures) = SIZED_ABSTRACT_TYPE.captures(spec) {
        if let Ok(abstract_type) = AbstractType::from_str(&captures[1]) {
            let size = format!("({})", &captures[2]);
            let physical = SIZE_ARGUMENT.replace(physical_for(abstract_type), NoExpand(&size));
            return format!("{}{}", physical, &captures[3]);
        }
    } else if let Some(captures) = PREFIXED_ABSTRACT_TYPE.captures(spec) {
        if let Ok(abstract_type) = AbstractType::from_str(&captures[1]) {
            return format!("{}{}", physical_for(abstract_type), &captures[2]);
        }
    }

    spec.to_string()
}
