#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Period};

// Fragment serializers
mod column_def;
mod name;
mod statement;
mod ty;
mod value;

use crate::stmt::Statement;

/// Serialize a statement to a SQL string
#[derive(Debug, Default)]
pub struct Serializer {
    _priv: (),
}

struct Formatter<'a> {
    /// Where to write the serialized SQL
    dst: &'a mut String,
}

impl Serializer {
    /// The only dialect emitted is PostgreSQL.
    pub fn postgresql() -> Serializer {
        Serializer { _priv: () }
    }

    pub fn serialize(&self, stmt: &Statement) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter { dst: &mut ret };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }
}
