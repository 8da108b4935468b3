use super::{app::FieldId, ClassifiedSchema, TableId};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Key lookups across the whole application.
///
/// Built once every table is classified and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct Index {
    tables: IndexMap<String, TableId>,
    fields: IndexMap<String, FieldId>,
}

impl Index {
    pub fn build(schema: &ClassifiedSchema) -> Result<Index> {
        let mut index = Index::default();

        for table in &schema.tables {
            if index.tables.insert(table.key.clone(), table.id).is_some() {
                return Err(Error::invalid_metadata(format!(
                    "object key `{}` is defined more than once",
                    table.key
                )));
            }

            for field in table.domain_fields() {
                if let Some(other) = index.fields.insert(field.key.clone(), field.id) {
                    return Err(Error::invalid_metadata(format!(
                        "field key `{}` is defined on both `{}` and `{}`",
                        field.key,
                        schema.table(other.table).key,
                        table.key
                    )));
                }
            }
        }

        Ok(index)
    }

    pub fn table(&self, key: &str) -> Option<TableId> {
        self.tables.get(key).copied()
    }

    pub fn field(&self, key: &str) -> Option<FieldId> {
        self.fields.get(key).copied()
    }

    /// Looks up an object on behalf of the field `referencing`.
    pub fn resolve_table(&self, referencing: &str, key: &str) -> Result<TableId> {
        self.table(key)
            .ok_or_else(|| Error::missing_field_reference(referencing, key))
    }

    /// Looks up a field on behalf of the field `referencing`.
    pub fn resolve_field(&self, referencing: &str, key: &str) -> Result<FieldId> {
        self.field(key)
            .ok_or_else(|| Error::missing_field_reference(referencing, key))
    }
}
