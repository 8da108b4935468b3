//! A description of every generated column, for tools that read the
//! database without the source metadata.

use crate::formula::CompiledFormula;
use crate::schema::app::{Field, FieldId, FieldTy};
use crate::schema::ResolvedSchema;

use indexmap::IndexMap;
use serde::Serialize;

/// One row of the field catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub table_name: String,

    /// The view exposing the column. Association tables have none.
    pub view_name: Option<String>,

    pub column_name: String,

    pub data_type: String,

    /// The source field type, or `connection`/`association` for reference
    /// columns
    pub input_type: String,

    pub is_primary_key: bool,

    /// True if the column only exists in the view
    pub is_formula: bool,

    pub is_connection: bool,

    /// True for columns that are generated rather than entered
    pub read_only: bool,

    /// Choices of a multiple choice field
    pub options: Option<Vec<String>>,
}

pub(crate) fn build(
    schema: &ResolvedSchema,
    formulas: &IndexMap<FieldId, CompiledFormula>,
) -> Vec<CatalogEntry> {
    let mut entries = vec![];

    for table in &schema.tables {
        let view_name = (!table.is_association()).then(|| schema.table(table.id).view_name());

        for (i, column) in table.columns.iter().enumerate() {
            let field = column.field.map(|id| schema.field(id));
            let standard = field.and_then(Field::as_standard);
            let is_primary_key = column.primary_key || table.primary_key.contains(&i);

            let input_type = match (standard, field) {
                (Some(standard), _) => standard.input_type.clone(),
                (None, Some(_)) => "connection".to_string(),
                (None, None) => "association".to_string(),
            };

            entries.push(CatalogEntry {
                table_name: table.name.clone(),
                view_name: view_name.clone(),
                column_name: column.name.clone(),
                data_type: column.ty.to_string(),
                input_type,
                is_primary_key,
                is_formula: false,
                is_connection: standard.is_none(),
                read_only: is_primary_key || field.map(|field| field.synthetic).unwrap_or(false),
                options: standard.and_then(|standard| standard.options.clone()),
            });
        }

        if table.is_association() {
            continue;
        }

        for field in schema.table(table.id).formula_fields() {
            if !formulas.contains_key(&field.id) {
                continue;
            }

            let input_type = match &field.ty {
                FieldTy::Aggregate(aggregate) => aggregate.method.source_name(),
                _ => "concatenation",
            };

            entries.push(CatalogEntry {
                table_name: table.name.clone(),
                view_name: view_name.clone(),
                column_name: field.name.ident.clone(),
                data_type: field
                    .ty
                    .formula_ty()
                    .map(|ty| ty.to_string())
                    .unwrap_or_default(),
                input_type: input_type.to_string(),
                is_primary_key: false,
                is_formula: true,
                is_connection: false,
                read_only: true,
                options: None,
            });
        }
    }

    entries
}
