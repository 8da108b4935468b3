use super::{db, ClassifiedSchema, ResolvedSchema};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashSet;

/// Two objects whose names sanitize to the same table name cannot both be
/// created.
pub(super) fn table_names(schema: &ClassifiedSchema) -> Result<()> {
    let mut names: IndexMap<&str, &str> = IndexMap::new();

    for table in &schema.tables {
        if let Some(first) = names.insert(&table.name.ident, &table.name.label) {
            return Err(Error::identifier_collision(
                "tables",
                first,
                &table.name.label,
                &table.name.ident,
            ));
        }
    }

    Ok(())
}

/// Every storage table must have distinct column names and at least one key.
pub(super) fn columns(tables: &[db::Table]) -> Result<()> {
    for table in tables {
        let mut names = HashSet::new();

        for column in &table.columns {
            if !names.insert(column.name.as_str()) {
                return Err(Error::identifier_collision(
                    &table.name,
                    &column.name,
                    &column.name,
                    &column.name,
                ));
            }
        }

        let keyed = !table.primary_key.is_empty() || table.columns.iter().any(|c| c.primary_key);
        if !keyed {
            return Err(Error::invalid_metadata(format!(
                "table `{}` has no primary key",
                table.name
            )));
        }
    }

    Ok(())
}

/// Tables and views share one namespace in the data schema. A view is named
/// after its table, so an object called `Orders View` takes the name of the
/// `Orders` view.
pub(super) fn relation_names(schema: &ResolvedSchema) -> Result<()> {
    let mut names: IndexMap<String, String> = IndexMap::new();

    let tables = schema.tables.iter().map(|table| {
        let label = if table.is_association() {
            table.name.clone()
        } else {
            schema.app.table(table.id).name.label.clone()
        };
        (table.name.clone(), label)
    });

    let views = schema
        .app
        .tables
        .iter()
        .map(|table| (table.view_name(), format!("view of {}", table.name.label)));

    for (name, label) in tables.chain(views) {
        if let Some(first) = names.get(&name) {
            return Err(Error::identifier_collision("relations", first, &label, &name));
        }

        names.insert(name, label);
    }

    Ok(())
}

/// PostgreSQL truncates identifiers longer than this many bytes, which would
/// silently merge distinct names.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Every generated table, view, column and constraint name must fit in a
/// PostgreSQL identifier.
pub(super) fn identifier_lengths(schema: &ResolvedSchema) -> Result<()> {
    let tables = schema.tables.iter().flat_map(|table| {
        std::iter::once(table.name.as_str())
            .chain(table.columns.iter().map(|column| column.name.as_str()))
    });

    let views = schema.app.tables.iter().map(|table| table.view_name());

    let foreign_keys = schema.foreign_keys.iter().map(|fk| fk.name.as_str());

    for name in tables.chain(foreign_keys).map(str::to_string).chain(views) {
        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(Error::invalid_metadata(format!(
                "identifier `{name}` is longer than {MAX_IDENTIFIER_LEN} bytes"
            )));
        }
    }

    Ok(())
}
