//! Compiles aggregate and text formula fields into view columns.

mod aggregate;

pub mod ast;

mod concat;

mod eval;
pub use eval::CompiledExpr;

mod method;
pub use method::Function;

mod parse;
pub use parse::parse;

use crate::compiled::Diagnostics;
use crate::schema::app::{Field, FieldId, FieldTy};
use crate::schema::{Relation, ResolvedSchema, TableId};
use crate::view::Join;
use crate::{Error, Result, Unit};

use indexmap::{IndexMap, IndexSet};

/// A formula field compiled into a view column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFormula {
    pub field: FieldId,

    /// The select-list expression, aliased to the field's name
    pub sql: String,

    /// Joins the owning view needs for this expression
    pub joins: Vec<Join>,

    /// Other views the expression reads
    pub depends_on: IndexSet<String>,
}

/// Compiles every formula field of every table.
///
/// Fields that fail are reported to `diagnostics` and left out.
pub(crate) fn compile_all(
    schema: &ResolvedSchema,
    diagnostics: &mut Diagnostics,
) -> Result<IndexMap<FieldId, CompiledFormula>> {
    let mut formulas = IndexMap::new();

    for table in &schema.app.tables {
        for field in table.formula_fields() {
            match compile(schema, field) {
                Ok(formula) => {
                    formulas.insert(field.id, formula);
                }
                Err(err) => diagnostics.error(Unit::field(&table.key, &field.key), err)?,
            }
        }
    }

    Ok(formulas)
}

/// Compiles one formula field.
pub fn compile(schema: &ResolvedSchema, field: &Field) -> Result<CompiledFormula> {
    match &field.ty {
        FieldTy::Aggregate(aggregate) => aggregate::compile(schema, field, aggregate),
        FieldTy::Concatenation(concatenation) => concat::compile(schema, field, concatenation),
        _ => Err(Error::invalid_formula(&field.key, "not a formula field")),
    }
}

/// Where rows of a connected table are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Source {
    /// View or table read
    relation: String,

    /// Alias, when the host table is read from inside its own view
    alias: Option<String>,
}

impl Source {
    /// The view of `other`, or its base table when `other` is the host.
    fn new(schema: &ResolvedSchema, host: TableId, other: TableId) -> Source {
        let table = schema.table(other);

        if other == host {
            Source {
                relation: table.name.ident.clone(),
                alias: Some("related".to_string()),
            }
        } else {
            Source {
                relation: table.view_name(),
                alias: None,
            }
        }
    }

    fn is_view(&self) -> bool {
        self.alias.is_none()
    }

    /// The `FROM` item.
    fn from(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {alias}", self.relation),
            None => self.relation.clone(),
        }
    }

    /// The name columns are qualified with.
    fn name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.relation)
    }
}

/// How rows on the other side of a relation link back to a host row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link<'a> {
    /// The other table holds a column referencing the host
    Inbound { column: &'a str },

    /// The host holds a column referencing the other table
    Outbound { column: &'a str, array: bool },

    /// An association table holds both ids
    Association {
        table: &'a str,
        host_column: &'a str,
        other_column: &'a str,
    },
}

impl<'a> Link<'a> {
    /// Describes `relation` from `host`'s side.
    ///
    /// A relation from a table to itself can be followed both ways. `outbound`
    /// picks following the host's own column.
    fn new(
        schema: &'a ResolvedSchema,
        relation: &'a Relation,
        host: TableId,
        outbound: bool,
    ) -> Option<Link<'a>> {
        match relation {
            Relation::Single {
                holder,
                column,
                referenced,
                array,
            } => {
                if *holder == host && (*referenced != host || outbound || *array) {
                    Some(Link::Outbound {
                        column,
                        array: *array,
                    })
                } else if *referenced == host {
                    Some(Link::Inbound { column })
                } else {
                    None
                }
            }
            Relation::ManyToMany {
                association,
                host: first,
                target,
                host_column,
                target_column,
            } => {
                let table = &schema.db_table(*association).name;

                if *first == host {
                    Some(Link::Association {
                        table,
                        host_column,
                        other_column: target_column,
                    })
                } else if *target == host {
                    Some(Link::Association {
                        table,
                        host_column: target_column,
                        other_column: host_column,
                    })
                } else {
                    None
                }
            }
        }
    }

    /// `FROM` and `WHERE` of a subquery reading the rows linked to a row of
    /// `host`.
    fn filter(&self, source: &Source, host: &str) -> String {
        let name = source.name();

        match self {
            Link::Inbound { column } => {
                format!("FROM {} WHERE {name}.{column} = {host}.id", source.from())
            }
            Link::Outbound {
                column,
                array: false,
            } => format!("FROM {} WHERE {name}.id = {host}.{column}", source.from()),
            Link::Outbound { column, array: true } => {
                format!("FROM {} WHERE {name}.id = ANY({host}.{column})", source.from())
            }
            Link::Association {
                table,
                host_column,
                other_column,
            } => format!(
                "FROM {} JOIN {table} ON {table}.{other_column} = {name}.id \
                 AND {table}.{host_column} = {host}.id",
                source.from()
            ),
        }
    }
}

/// The column `field` is read from.
///
/// With `stored_only`, formula fields are rejected: they only exist in views.
fn readable_column(schema: &ResolvedSchema, field: &Field, stored_only: bool) -> Result<String> {
    let table = schema.table(field.id.table);

    match &field.ty {
        FieldTy::Standard(_) => Ok(field.name.ident.clone()),
        FieldTy::Aggregate(_) | FieldTy::Concatenation(_) if !stored_only => {
            Ok(field.name.ident.clone())
        }
        FieldTy::Aggregate(_) | FieldTy::Concatenation(_) => Err(Error::unsupported_feature(
            format!(
                "formula field `{}` of `{}` cannot be read from the base table",
                field.key, table.name
            ),
        )),
        FieldTy::Connection(_) => schema
            .column(field.id)
            .map(|column| column.name.clone())
            .ok_or_else(|| {
                Error::unsupported_feature(format!(
                    "connection `{}` has no column on `{}`",
                    field.key, table.name
                ))
            }),
    }
}

/// The relation a formula reaches through `connection`, seen from `host`.
fn connection<'a>(
    schema: &'a ResolvedSchema,
    formula: &Field,
    connection: &str,
) -> Result<(&'a Field, &'a Relation)> {
    let id = schema.index.resolve_field(&formula.key, connection)?;
    let field = schema.field(id);

    if !field.is_connection() {
        return Err(Error::invalid_formula(
            &formula.key,
            format!("`{connection}` is not a connection field"),
        ));
    }

    let relation = schema.relation(id).ok_or_else(|| {
        Error::invalid_formula(
            &formula.key,
            format!("connection `{connection}` could not be resolved"),
        )
    })?;

    Ok((field, relation))
}
