use super::{Name, Statement};

use knackpg_core::view::{Join, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateView {
    pub name: Name,

    /// The table selected from, unqualified so columns can refer to it
    pub table: String,

    /// The table selected from, qualified
    pub from: Name,

    /// Extra select-list expressions
    pub columns: Vec<String>,

    pub joins: Vec<Join>,
}

impl Statement {
    pub fn create_view(view: &View) -> Self {
        CreateView {
            name: Name::qualified(&view.schema, &view.name),
            table: view.table.clone(),
            from: Name::qualified(&view.schema, &view.table),
            columns: view.columns.clone(),
            joins: view.joins.clone(),
        }
        .into()
    }
}

impl From<CreateView> for Statement {
    fn from(value: CreateView) -> Self {
        Self::CreateView(value)
    }
}
