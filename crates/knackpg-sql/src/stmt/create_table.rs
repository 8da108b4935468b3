use super::{ColumnDef, Name, Statement};

use knackpg_core::schema::db::{Table, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Name of the table
    pub name: Name,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Constraints listed after the columns
    pub constraints: Vec<TableConstraint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
}

impl Statement {
    pub fn create_table(table: &Table) -> Self {
        let mut constraints = vec![];

        if !table.primary_key.is_empty() {
            constraints.push(TableConstraint::PrimaryKey(
                table
                    .primary_key_columns()
                    .map(|column| column.name.clone())
                    .collect(),
            ));
        }

        CreateTable {
            name: Name::qualified(&table.schema, &table.name),
            columns: table
                .columns
                .iter()
                .map(|column| ColumnDef::from_schema(column, &table.schema))
                .collect(),
            constraints,
        }
        .into()
    }

    /// The table holding the field catalog.
    pub fn create_catalog_table(schema: &str) -> Self {
        let text = |name| ColumnDef::new(name, Type::Text).not_null();
        let flag = |name| ColumnDef::new(name, Type::Boolean).not_null();

        CreateTable {
            name: Name::qualified(schema, "fields"),
            columns: vec![
                ColumnDef::new("id", Type::Serial).primary_key(),
                text("table_name"),
                ColumnDef::new("view_name", Type::Text),
                text("column_name"),
                text("data_type"),
                text("input_type"),
                flag("is_primary_key"),
                flag("is_formula"),
                flag("is_connection"),
                flag("read_only"),
                ColumnDef::new("options", Type::Text.array()),
            ],
            constraints: vec![TableConstraint::Unique(vec![
                "table_name".to_string(),
                "column_name".to_string(),
            ])],
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
