use crate::{Serializer, Statement};

use knackpg_core::CompiledSchema;

use log::{debug, error};
use std::fmt;

/// Every statement needed to create a compiled schema, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    statements: Vec<Statement>,
}

/// Runs one SQL statement against a database.
pub trait Execute {
    fn execute(&mut self, sql: &str) -> anyhow::Result<()>;
}

impl<F> Execute for F
where
    F: FnMut(&str) -> anyhow::Result<()>,
{
    fn execute(&mut self, sql: &str) -> anyhow::Result<()> {
        self(sql)
    }
}

/// A statement the database rejected.
#[derive(Debug)]
pub struct Failure {
    /// Index of the statement in the script
    pub index: usize,

    pub sql: String,

    pub error: anyhow::Error,
}

impl Script {
    pub fn from_compiled(schema: &CompiledSchema) -> Script {
        let mut statements = vec![Statement::create_schema(&schema.data_schema)];

        if schema.metadata_schema != schema.data_schema {
            statements.push(Statement::create_schema(&schema.metadata_schema));
        }

        // Views and subqueries name their sources unqualified
        statements.push(Statement::set_search_path(&[schema.data_schema.as_str()]));

        // Object tables come before association tables in `tables` already
        statements.extend(schema.tables.iter().map(Statement::create_table));

        statements.extend(
            schema
                .foreign_keys
                .iter()
                .map(|fk| Statement::add_foreign_key(&schema.data_schema, fk)),
        );

        statements.extend(schema.views.iter().map(Statement::create_view));

        statements.push(Statement::create_catalog_table(&schema.metadata_schema));
        statements.extend(
            schema
                .catalog
                .iter()
                .map(|entry| Statement::insert_catalog_entry(&schema.metadata_schema, entry)),
        );

        Script { statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn to_sql(&self, serializer: &Serializer) -> Vec<String> {
        self.statements
            .iter()
            .map(|stmt| serializer.serialize(stmt))
            .collect()
    }

    /// Runs every statement in order. A failing statement is logged and
    /// skipped; the remaining statements still run.
    pub fn execute(&self, db: &mut impl Execute) -> Vec<Failure> {
        let serializer = Serializer::postgresql();
        let mut failures = vec![];

        for (index, stmt) in self.statements.iter().enumerate() {
            let sql = serializer.serialize(stmt);

            match db.execute(&sql) {
                Ok(()) => debug!("created {}", stmt.describe()),
                Err(err) => {
                    error!("failed to create {}: {err:#}", stmt.describe());
                    failures.push(Failure {
                        index,
                        sql,
                        error: err,
                    });
                }
            }
        }

        debug!(
            "executed {} statements, {} failed",
            self.statements.len(),
            failures.len()
        );
        failures
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let serializer = Serializer::postgresql();
        let mut s = "";
        for stmt in &self.statements {
            write!(f, "{s}{}", serializer.serialize(stmt))?;
            s = "\n\n";
        }
        writeln!(f)
    }
}
