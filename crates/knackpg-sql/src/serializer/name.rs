use super::{Formatter, Period, ToSql};

use crate::stmt;

impl ToSql for &stmt::Name {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let parts = Period(&self.0);
        fmt!(f, parts);
    }
}
