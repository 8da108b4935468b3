use super::{Name, Statement};

use knackpg_core::CatalogEntry;

/// A single-row insert that skips rows already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    pub table: Name,
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Text(String),
    TextArray(Vec<String>),
}

impl Statement {
    pub fn insert_catalog_entry(schema: &str, entry: &CatalogEntry) -> Self {
        let text = |value: &str| Value::Text(value.to_string());

        let fields = [
            ("table_name", text(&entry.table_name)),
            (
                "view_name",
                entry.view_name.as_deref().map(text).unwrap_or(Value::Null),
            ),
            ("column_name", text(&entry.column_name)),
            ("data_type", text(&entry.data_type)),
            ("input_type", text(&entry.input_type)),
            ("is_primary_key", Value::Bool(entry.is_primary_key)),
            ("is_formula", Value::Bool(entry.is_formula)),
            ("is_connection", Value::Bool(entry.is_connection)),
            ("read_only", Value::Bool(entry.read_only)),
            (
                "options",
                entry
                    .options
                    .clone()
                    .map(Value::TextArray)
                    .unwrap_or(Value::Null),
            ),
        ];

        let (columns, values): (Vec<_>, Vec<_>) = fields
            .into_iter()
            .map(|(column, value)| (column.to_string(), value))
            .unzip();

        Insert {
            table: Name::qualified(schema, "fields"),
            columns,
            values,
        }
        .into()
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
