//! Application-level schema: objects and fields as the source system
//! describes them, classified into typed variants.

mod connection;
pub use connection::Connection;

mod field;
pub use field::{Field, FieldId, FieldTy, Standard};

mod formula;
pub use formula::{Aggregate, AggregateMethod, Concatenation};

mod table;
pub use table::Table;

use super::{Name, TableId};
