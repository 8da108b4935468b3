use super::{Comma, Formatter, ToSql};

use crate::stmt::{self, Statement, TableConstraint};

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::CreateSchema(stmt) => stmt.to_sql(f),
            Statement::SetSearchPath(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::AddForeignKey(stmt) => stmt.to_sql(f),
            Statement::CreateView(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::CreateSchema {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "CREATE SCHEMA IF NOT EXISTS " {&self.name});
    }
}

impl ToSql for &stmt::SetSearchPath {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let schemas = Comma(&self.schemas);
        fmt!(f, "SET search_path TO " schemas);
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "CREATE TABLE IF NOT EXISTS " {&self.name} " (");

        let mut s = "";
        for column in &self.columns {
            fmt!(f, s "\n    " column);
            s = ",";
        }

        for constraint in &self.constraints {
            fmt!(f, ",\n    " constraint);
        }

        fmt!(f, "\n)");
    }
}

impl ToSql for &TableConstraint {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            TableConstraint::PrimaryKey(columns) => {
                let columns = Comma(columns);
                fmt!(f, "PRIMARY KEY (" columns ")")
            }
            TableConstraint::Unique(columns) => {
                let columns = Comma(columns);
                fmt!(f, "UNIQUE (" columns ")")
            }
        }
    }
}

impl ToSql for &stmt::AddForeignKey {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(
            f, "ALTER TABLE " {&self.table} " ADD CONSTRAINT " {&self.name}
            " FOREIGN KEY (" {&self.column} ") REFERENCES " {&self.references} " (id)"
        );
    }
}

impl ToSql for &stmt::CreateView {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "CREATE VIEW " {&self.name} " AS\nSELECT " {&self.table} ".*");

        for column in &self.columns {
            fmt!(f, ",\n    " column);
        }

        fmt!(f, "\nFROM " {&self.from});

        for join in &self.joins {
            fmt!(
                f, "\nLEFT OUTER JOIN " {&join.relation} " AS " {&join.alias} " ON (" {&join.on} ")"
            );
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let columns = Comma(&self.columns);
        let values = Comma(&self.values);

        fmt!(f, "INSERT INTO " {&self.table} " (" columns ") VALUES (" values ")");
        fmt!(f, " ON CONFLICT DO NOTHING");
    }
}
