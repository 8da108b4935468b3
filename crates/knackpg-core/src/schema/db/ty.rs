use serde::{Serialize, Serializer};
use std::fmt;

/// PostgreSQL storage types used by generated tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,

    Integer,

    Json,

    Numeric,

    /// Auto-incrementing integer, used for surrogate keys
    Serial,

    Text,

    /// `TIMESTAMP WITH TIME ZONE`
    TimestampTz,

    Array(Box<Type>),
}

impl Type {
    /// Maps a source field type to the type of the column storing it.
    ///
    /// Formula types map to the type their view column evaluates to. Returns
    /// `None` for types that have no column representation.
    pub fn from_source(source_type: &str) -> Option<Type> {
        Some(match source_type {
            "short_text" | "paragraph_text" | "phone" | "link" | "multiple_choice"
            | "rich_text" | "file" | "image" | "email" | "signature" | "password"
            | "concatenation" | "_knack_id" => Type::Text,
            "count" | "sum" | "min" | "max" | "average" => Type::Numeric,
            "date_time" | "timer" => Type::TimestampTz,
            "number" | "currency" | "auto_increment" | "rating" => Type::Numeric,
            "address" | "name" => Type::Json,
            "user_roles" => Type::Array(Box::new(Type::Text)),
            "boolean" => Type::Boolean,
            "connection" => Type::Integer,
            "_pg_primary_key" => Type::Serial,
            _ => return None,
        })
    }

    /// Wraps the type in an array. Arrays do not nest.
    pub fn array(self) -> Type {
        match self {
            Type::Array(_) => self,
            ty => Type::Array(Box::new(ty)),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => f.write_str("BOOLEAN"),
            Type::Integer => f.write_str("INTEGER"),
            Type::Json => f.write_str("JSON"),
            Type::Numeric => f.write_str("NUMERIC"),
            Type::Serial => f.write_str("SERIAL"),
            Type::Text => f.write_str("TEXT"),
            Type::TimestampTz => f.write_str("TIMESTAMP WITH TIME ZONE"),
            Type::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
