use super::ast::FieldRef;
use super::eval::{eval_pieces, CompiledExpr, ResolveField};
use super::{connection, parse, readable_column, CompiledFormula, Link, Source};
use crate::schema::app::{self, Concatenation, Field};
use crate::schema::ResolvedSchema;
use crate::view::Join;
use crate::{Error, Result};

use indexmap::{IndexMap, IndexSet};

/// Compiles a text formula into a `CONCAT(...)` column.
pub(super) fn compile(
    schema: &ResolvedSchema,
    field: &Field,
    concatenation: &Concatenation,
) -> Result<CompiledFormula> {
    let formula = parse(&field.key, &concatenation.equation)?;

    let mut tokens = Tokens {
        schema,
        formula: field,
        host: schema.table(field.id.table),
        joins: IndexMap::new(),
        depends_on: IndexSet::new(),
    };

    let parts = eval_pieces(&formula.pieces, &mut tokens)?;

    Ok(CompiledFormula {
        field: field.id,
        sql: format!("{} AS {}", CompiledExpr::concat(parts), field.name),
        joins: tokens.joins.into_values().collect(),
        depends_on: tokens.depends_on,
    })
}

/// Resolves field tokens, collecting the joins and views they need.
struct Tokens<'a> {
    schema: &'a ResolvedSchema,
    formula: &'a Field,
    host: &'a app::Table,

    /// Joins by alias
    joins: IndexMap<String, Join>,
    depends_on: IndexSet<String>,
}

impl ResolveField for Tokens<'_> {
    fn resolve(&mut self, field: &FieldRef) -> Result<CompiledExpr> {
        match &field.via {
            None => self.own(&field.field),
            Some(via) => self.traverse(via, &field.field),
        }
    }
}

impl Tokens<'_> {
    /// `{field_N}`: a stored column of the host table.
    fn own(&self, key: &str) -> Result<CompiledExpr> {
        let id = self.schema.index.resolve_field(&self.formula.key, key)?;

        if id.table != self.host.id {
            return Err(Error::invalid_formula(
                &self.formula.key,
                format!(
                    "`{key}` is a field of `{}`, not `{}`",
                    self.schema.table(id.table).name,
                    self.host.name
                ),
            ));
        }

        let column = readable_column(self.schema, self.schema.field(id), true)?;
        Ok(CompiledExpr::new(format!("{}.{column}", self.host.name)))
    }

    /// `{field_N.field_M}`: a field of the table connected through `field_N`.
    fn traverse(&mut self, via: &str, key: &str) -> Result<CompiledExpr> {
        let schema = self.schema;
        let host = self.host;
        let (_, relation) = connection(schema, self.formula, via)?;

        let (Some(link), Some(other)) = (
            Link::new(schema, relation, host.id, true),
            relation.other(host.id),
        ) else {
            return Err(Error::invalid_formula(
                &self.formula.key,
                format!("connection `{via}` does not link to `{}`", host.name),
            ));
        };

        let target = schema.index.resolve_field(&self.formula.key, key)?;

        if target.table != other {
            return Err(Error::invalid_formula(
                &self.formula.key,
                format!(
                    "`{key}` is not a field of `{}`, the table `{via}` connects to",
                    schema.table(other).name
                ),
            ));
        }

        let source = Source::new(schema, host.id, other);
        let column = readable_column(schema, schema.field(target), !source.is_view())?;

        if source.is_view() {
            self.depends_on.insert(source.relation.clone());
        }

        if let Link::Outbound {
            column: join_column,
            array: false,
        } = link
        {
            self.joins
                .entry(join_column.to_string())
                .or_insert_with(|| Join {
                    relation: source.relation.clone(),
                    alias: join_column.to_string(),
                    on: format!("{}.{join_column} = {join_column}.id", host.name),
                });

            return Ok(CompiledExpr::new(format!("{join_column}.{column}")));
        }

        let name = source.name();
        Ok(CompiledExpr::new(format!(
            "(SELECT STRING_AGG({name}.{column}::text, ', ') {})",
            link.filter(&source, &host.name.ident)
        )))
    }
}
