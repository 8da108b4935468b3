//! Storage-level schema: tables, columns and constraints as they will exist in
//! PostgreSQL.

mod column;
pub use column::{Column, DefaultValue};

mod fk;
pub use fk::ForeignKey;

mod table;
pub use table::{Table, TableKind};

mod ty;
pub use ty::Type;

use super::TableId;
