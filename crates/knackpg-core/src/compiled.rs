use crate::schema::db;
use crate::{CatalogEntry, Error, Result, View};

use log::warn;
use std::fmt;

/// The output of a compile: everything needed to create the relational
/// schema, in creation order.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    /// PostgreSQL schema holding tables and views
    pub data_schema: String,

    /// PostgreSQL schema holding the field catalog
    pub metadata_schema: String,

    /// Object tables in source order, then association tables
    pub tables: Vec<db::Table>,

    pub foreign_keys: Vec<db::ForeignKey>,

    /// Views ordered so that every view follows the views it reads
    pub views: Vec<View>,

    pub catalog: Vec<CatalogEntry>,

    /// Units dropped or skipped during a lenient compile
    pub diagnostics: Vec<Diagnostic>,
}

/// A problem confined to one unit of the schema.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub unit: Unit,
    pub severity: Severity,
    pub error: Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The unit was skipped on purpose
    Warning,

    /// The unit could not be compiled
    Error,
}

/// The part of the schema a diagnostic applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// A whole object, by key
    Table { object: String },

    /// One field, by object and field key
    Field { object: String, field: String },
}

/// Collects diagnostics while the pipeline runs.
pub(crate) struct Diagnostics {
    strict: bool,
    items: Vec<Diagnostic>,
}

impl CompiledSchema {
    pub fn table(&self, name: &str) -> Option<&db::Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|view| view.name == name)
    }

    pub fn association_tables(&self) -> impl Iterator<Item = &db::Table> + '_ {
        self.tables.iter().filter(|table| table.is_association())
    }
}

impl Unit {
    pub fn table(object: &str) -> Unit {
        Unit::Table {
            object: object.to_string(),
        }
    }

    pub fn field(object: &str, field: &str) -> Unit {
        Unit::Field {
            object: object.to_string(),
            field: field.to_string(),
        }
    }

    pub fn object(&self) -> &str {
        match self {
            Unit::Table { object } | Unit::Field { object, .. } => object,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Table { object } => write!(f, "object `{object}`"),
            Unit::Field { object, field } => write!(f, "object `{object}`: field `{field}`"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.unit, self.error)
    }
}

impl Diagnostics {
    pub(crate) fn new(strict: bool) -> Diagnostics {
        Diagnostics {
            strict,
            items: vec![],
        }
    }

    /// Records a failed unit. In strict mode the failure is returned instead.
    pub(crate) fn error(&mut self, unit: Unit, error: Error) -> Result<()> {
        self.report(unit, Severity::Error, error)
    }

    pub(crate) fn report(&mut self, unit: Unit, severity: Severity, error: Error) -> Result<()> {
        if self.strict && severity == Severity::Error {
            return Err(error.context(unit.to_string()));
        }

        let diagnostic = Diagnostic {
            unit,
            severity,
            error,
        };

        warn!("skipping {diagnostic}");
        self.items.push(diagnostic);
        Ok(())
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_returns_first_error() {
        let mut diagnostics = Diagnostics::new(true);
        let err = diagnostics
            .error(
                Unit::field("object_1", "field_2"),
                Error::unsupported_function("random"),
            )
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "object `object_1`: field `field_2`: unsupported function: `random` has no SQL equivalent"
        );
        assert!(err.root().is_unsupported_function());
        assert!(diagnostics.into_vec().is_empty());
    }

    #[test]
    fn strict_still_records_warnings() {
        let mut diagnostics = Diagnostics::new(true);
        diagnostics
            .report(
                Unit::field("object_1", "field_3"),
                Severity::Warning,
                Error::unsupported_feature("equation"),
            )
            .unwrap();

        let items = diagnostics.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit.object(), "object_1");
    }

    #[test]
    fn lenient_records_errors() {
        let mut diagnostics = Diagnostics::new(false);
        diagnostics
            .error(Unit::table("object_2"), Error::invalid_metadata("bad"))
            .unwrap();

        let items = diagnostics.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].severity, Severity::Error);
        assert_eq!(
            items[0].to_string(),
            "object `object_2`: invalid metadata: bad"
        );
    }
}
