use super::{Column, TableId};

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Object tables share their id with the source table
    pub id: TableId,

    pub name: String,

    /// The PostgreSQL schema the table lives in
    pub schema: String,

    pub columns: Vec<Column>,

    /// Indices into `columns` forming a composite primary key. Empty when a
    /// single column carries the key itself.
    pub primary_key: Vec<usize>,

    pub kind: TableKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Stores the records of one source object
    Object,

    /// Links the records of two objects connected many-to-many
    Association,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.primary_key.iter().map(|index| &self.columns[*index])
    }

    pub fn is_association(&self) -> bool {
        matches!(self.kind, TableKind::Association)
    }
}
