use super::Name;

use knackpg_core::schema::db::{Column, DefaultValue, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,

    pub ty: Type,

    pub not_null: bool,

    pub unique: bool,

    /// True if the column alone is the primary key
    pub primary_key: bool,

    pub default: Option<DefaultValue>,

    /// Table whose `id` the column references, with cascading deletes
    pub references: Option<Name>,
}

impl ColumnDef {
    pub fn new(name: &str, ty: Type) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            ty,
            not_null: false,
            unique: false,
            primary_key: false,
            default: None,
            references: None,
        }
    }

    pub(crate) fn from_schema(column: &Column, schema: &str) -> ColumnDef {
        ColumnDef {
            name: column.name.clone(),
            ty: column.ty.clone(),
            not_null: !column.nullable,
            unique: column.unique,
            primary_key: column.primary_key,
            default: column.default.clone(),
            references: column
                .references
                .as_deref()
                .map(|table| Name::qualified(schema, table)),
        }
    }

    pub fn not_null(mut self) -> ColumnDef {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> ColumnDef {
        self.primary_key = true;
        self
    }
}
