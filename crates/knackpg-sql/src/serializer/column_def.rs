use super::{Formatter, ToSql};

use crate::stmt;

impl ToSql for &stmt::ColumnDef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, &self.name " " {&self.ty});

        if self.primary_key {
            fmt!(f, " PRIMARY KEY");
        }

        if let Some(default) = &self.default {
            fmt!(f, " DEFAULT " default);
        }

        // Implied by PRIMARY KEY
        if !self.primary_key {
            if self.not_null {
                fmt!(f, " NOT NULL");
            }

            if self.unique {
                fmt!(f, " UNIQUE");
            }
        }

        if let Some(references) = &self.references {
            fmt!(f, " REFERENCES " references " (id) ON DELETE CASCADE");
        }
    }
}
