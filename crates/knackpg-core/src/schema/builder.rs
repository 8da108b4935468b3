mod table;

use super::{raw::RawSchema, verify, ClassifiedSchema, Index, Name, TableId};
use crate::{catalog, compiled::Diagnostics, formula, view, CompiledSchema, Result, Unit};

use indexmap::IndexSet;
use log::debug;

/// Configures and runs a schema compile.
#[derive(Debug, Clone)]
pub struct Builder {
    /// PostgreSQL schema holding tables and views
    data_schema: String,

    /// PostgreSQL schema holding the field catalog
    metadata_schema: String,

    /// If set, only these object keys are compiled
    objects: Option<IndexSet<String>>,

    /// If true, the first unit that fails aborts the compile
    strict: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            data_schema: "public".to_string(),
            metadata_schema: "__meta__".to_string(),
            objects: None,
            strict: true,
        }
    }

    pub fn data_schema(&mut self, name: &str) -> &mut Self {
        self.data_schema = Name::new(name).ident;
        self
    }

    pub fn metadata_schema(&mut self, name: &str) -> &mut Self {
        self.metadata_schema = Name::new(name).ident;
        self
    }

    /// Restricts the compile to the given object keys.
    pub fn objects<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objects = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    pub fn build(&self, raw: &RawSchema) -> Result<CompiledSchema> {
        let mut diagnostics = Diagnostics::new(self.strict);

        let classified = self.classify(raw, &mut diagnostics)?;
        verify::table_names(&classified)?;
        debug!("classified {} tables", classified.tables.len());

        let index = Index::build(&classified)?;

        let resolved =
            super::resolve::resolve(classified, index, &self.data_schema, &mut diagnostics)?;
        verify::columns(&resolved.tables)?;
        verify::relation_names(&resolved)?;
        verify::identifier_lengths(&resolved)?;
        debug!(
            "resolved {} relations, {} tables",
            resolved.relations.len(),
            resolved.tables.len()
        );

        let formulas = formula::compile_all(&resolved, &mut diagnostics)?;
        debug!("compiled {} formulas", formulas.len());

        let views = view::sequence(view::build(&resolved, &formulas))?;
        let catalog = catalog::build(&resolved, &formulas);

        Ok(CompiledSchema {
            data_schema: self.data_schema.clone(),
            metadata_schema: self.metadata_schema.clone(),
            tables: resolved.tables,
            foreign_keys: resolved.foreign_keys,
            views,
            catalog,
            diagnostics: diagnostics.into_vec(),
        })
    }

    fn classify(&self, raw: &RawSchema, diagnostics: &mut Diagnostics) -> Result<ClassifiedSchema> {
        let mut schema = ClassifiedSchema::default();

        if let Some(objects) = &self.objects {
            for key in objects {
                if !raw.objects.iter().any(|object| &object.key == key) {
                    debug!("object filter names unknown object `{key}`");
                }
            }
        }

        for object in &raw.objects {
            if !self.includes(&object.key) {
                debug!("skipping filtered object `{}`", object.key);
                continue;
            }

            let id = TableId(schema.tables.len());

            match table::build(id, object) {
                Ok(built) => {
                    for skipped in built.skipped {
                        let unit = Unit::field(&object.key, &skipped.field);
                        diagnostics.report(unit, skipped.severity, skipped.error)?;
                    }

                    schema.tables.push(built.table);
                }
                Err(err) => diagnostics.error(Unit::table(&object.key), err)?,
            }
        }

        Ok(schema)
    }

    fn includes(&self, key: &str) -> bool {
        self.objects
            .as_ref()
            .map(|objects| objects.contains(key))
            .unwrap_or(true)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
