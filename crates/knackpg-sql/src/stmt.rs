mod add_foreign_key;
pub use add_foreign_key::AddForeignKey;

mod column_def;
pub use column_def::ColumnDef;

mod create_schema;
pub use create_schema::CreateSchema;

mod create_table;
pub use create_table::{CreateTable, TableConstraint};

mod create_view;
pub use create_view::CreateView;

mod insert;
pub use insert::{Insert, Value};

mod name;
pub use name::Name;

mod set_search_path;
pub use set_search_path::SetSearchPath;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateSchema(CreateSchema),
    SetSearchPath(SetSearchPath),
    CreateTable(CreateTable),
    AddForeignKey(AddForeignKey),
    CreateView(CreateView),
    Insert(Insert),
}

impl Statement {
    /// A short description of what the statement creates, for logs.
    pub fn describe(&self) -> String {
        match self {
            Statement::CreateSchema(stmt) => format!("schema {}", stmt.name),
            Statement::SetSearchPath(_) => "search path".to_string(),
            Statement::CreateTable(stmt) => format!("table {}", stmt.name),
            Statement::AddForeignKey(stmt) => format!("foreign key {}", stmt.name),
            Statement::CreateView(stmt) => format!("view {}", stmt.name),
            Statement::Insert(stmt) => format!("row in {}", stmt.table),
        }
    }

    pub fn is_create_view(&self) -> bool {
        matches!(self, Statement::CreateView(_))
    }
}
