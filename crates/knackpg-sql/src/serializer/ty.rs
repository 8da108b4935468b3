use super::{Formatter, ToSql};

use knackpg_core::schema::db::Type;

impl ToSql for &Type {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Type::Boolean => fmt!(f, "BOOLEAN"),
            Type::Integer => fmt!(f, "INTEGER"),
            Type::Json => fmt!(f, "JSON"),
            Type::Numeric => fmt!(f, "NUMERIC"),
            Type::Serial => fmt!(f, "SERIAL"),
            Type::Text => fmt!(f, "TEXT"),
            Type::TimestampTz => fmt!(f, "TIMESTAMP WITH TIME ZONE"),
            Type::Array(elem) => fmt!(f, &**elem "[]"),
        }
    }
}
