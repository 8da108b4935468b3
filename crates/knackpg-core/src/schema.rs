pub mod app;

mod builder;
pub use builder::Builder;

pub mod db;

mod index;
pub use index::Index;

mod name;
pub use name::Name;

pub mod raw;

mod resolve;
pub use resolve::{Relation, ResolvedSchema};

mod verify;

use app::{Field, FieldId};
use std::fmt;

/// Uniquely identifies a table.
///
/// Object tables use the same id at the app and db level. Association tables
/// are numbered after every object table.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

/// Every object of the application, classified into typed fields.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedSchema {
    pub tables: Vec<app::Table>,
}

impl ClassifiedSchema {
    pub fn table(&self, id: TableId) -> &app::Table {
        &self.tables[id.0]
    }

    pub fn field(&self, id: FieldId) -> &Field {
        self.table(id.table).field(id)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.tables.iter().flat_map(|table| table.fields.iter())
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
