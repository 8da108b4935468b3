use super::{connection, readable_column, CompiledFormula, Link, Source};
use crate::schema::app::{Aggregate, Field};
use crate::schema::ResolvedSchema;
use crate::{Error, Result};

use indexmap::IndexSet;

/// Compiles a `count`/`sum`/`min`/`max`/`average` field into a correlated
/// subquery over the connected table's view.
pub(super) fn compile(
    schema: &ResolvedSchema,
    field: &Field,
    aggregate: &Aggregate,
) -> Result<CompiledFormula> {
    let host = schema.table(field.id.table);
    let (_, relation) = connection(schema, field, &aggregate.connection)?;

    let (Some(link), Some(other)) = (
        Link::new(schema, relation, host.id, false),
        relation.other(host.id),
    ) else {
        return Err(Error::invalid_formula(
            &field.key,
            format!(
                "connection `{}` does not link to `{}`",
                aggregate.connection, host.name
            ),
        ));
    };

    let source = Source::new(schema, host.id, other);

    let column = if aggregate.method.is_count() {
        "id".to_string()
    } else {
        let Some(target) = &aggregate.target else {
            return Err(Error::invalid_formula(&field.key, "no target field"));
        };

        let target_id = schema.index.resolve_field(&field.key, target)?;

        if target_id.table != other {
            return Err(Error::invalid_formula(
                &field.key,
                format!(
                    "target `{target}` is not a field of `{}`",
                    schema.table(other).name
                ),
            ));
        }

        readable_column(schema, schema.field(target_id), !source.is_view())?
    };

    let sql = format!(
        "(SELECT {}({}.{column}) {}) AS {}",
        aggregate.method.sql_name(),
        source.name(),
        link.filter(&source, &host.name.ident),
        field.name
    );

    let mut depends_on = IndexSet::new();
    if source.is_view() {
        depends_on.insert(source.relation);
    }

    Ok(CompiledFormula {
        field: field.id,
        sql,
        joins: vec![],
        depends_on,
    })
}
