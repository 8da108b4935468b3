use super::{Aggregate, Concatenation, Connection, Name, TableId};
use crate::schema::db;

use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the schema
    pub id: FieldId,

    /// The source system's field key (`field_12`). Synthetic fields use their
    /// column name.
    pub key: String,

    pub name: Name,

    pub ty: FieldTy,

    /// True for the surrogate and natural key fields appended to every table
    pub synthetic: bool,

    /// Source attributes no stage interprets
    pub raw: Map<String, Value>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub table: TableId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Standard(Standard),
    Connection(Connection),
    Aggregate(Aggregate),
    Concatenation(Concatenation),
}

/// A field stored as a plain column.
#[derive(Debug, Clone)]
pub struct Standard {
    /// The source type, e.g. `short_text`
    pub source_type: String,

    /// What the catalog reports as the input type. Multiple choice fields
    /// report their choice style (`single`, `multi`, ...).
    pub input_type: String,

    pub storage_ty: db::Type,

    pub default: Option<db::DefaultValue>,

    pub nullable: bool,

    pub unique: bool,

    pub primary_key: bool,

    /// Choices of a multiple choice field
    pub options: Option<Vec<String>>,
}

impl Field {
    pub fn is_formula(&self) -> bool {
        self.ty.is_formula()
    }

    pub fn is_connection(&self) -> bool {
        self.ty.is_connection()
    }

    pub fn as_standard(&self) -> Option<&Standard> {
        self.ty.as_standard()
    }
}

impl FieldTy {
    pub fn is_standard(&self) -> bool {
        matches!(self, Self::Standard(..))
    }

    pub fn as_standard(&self) -> Option<&Standard> {
        match self {
            Self::Standard(standard) => Some(standard),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(..))
    }

    pub fn as_connection(&self) -> Option<&Connection> {
        match self {
            Self::Connection(connection) => Some(connection),
            _ => None,
        }
    }

    /// True for the connection variant that needs an association table.
    pub fn is_many_to_many(&self) -> bool {
        self.as_connection()
            .map(|connection| connection.is_many_to_many())
            .unwrap_or(false)
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(..))
    }

    pub fn is_concatenation(&self) -> bool {
        matches!(self, Self::Concatenation(..))
    }

    /// Formula fields are computed by the table's view rather than stored.
    pub fn is_formula(&self) -> bool {
        self.is_aggregate() || self.is_concatenation()
    }

    /// The type a formula column evaluates to.
    pub fn formula_ty(&self) -> Option<db::Type> {
        match self {
            Self::Aggregate(_) => Some(db::Type::Numeric),
            Self::Concatenation(_) => Some(db::Type::Text),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.table.0, self.index)
    }
}
