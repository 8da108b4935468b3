use super::Type;
use crate::schema::app::FieldId;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database
    pub name: String,

    pub ty: Type,

    pub nullable: bool,

    pub unique: bool,

    /// True if the column alone is the table's primary key. Composite keys are
    /// listed on the table instead.
    pub primary_key: bool,

    pub default: Option<DefaultValue>,

    /// Table whose `id` this column references inline, with cascading deletes
    pub references: Option<String>,

    /// The field the column stores. Association table columns have none.
    pub field: Option<FieldId>,
}

/// A literal column default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),

    /// A number, kept in its source spelling
    Number(String),

    Text(String),
}

impl Column {
    pub(crate) fn new(name: impl Into<String>, ty: Type) -> Column {
        Column {
            name: name.into(),
            ty,
            nullable: true,
            unique: false,
            primary_key: false,
            default: None,
            references: None,
            field: None,
        }
    }
}
