mod sequence;
pub use sequence::sequence;

use crate::formula::CompiledFormula;
use crate::schema::{app::FieldId, ResolvedSchema};

use indexmap::{IndexMap, IndexSet};

/// A view exposing a table's columns plus its formula columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// `<table>_view`
    pub name: String,

    /// The PostgreSQL schema the view lives in
    pub schema: String,

    /// The table the view selects from
    pub table: String,

    /// Formula expressions, each aliased to its column name
    pub columns: Vec<String>,

    pub joins: Vec<Join>,

    /// Views read by this view's expressions
    pub depends_on: IndexSet<String>,
}

/// `LEFT OUTER JOIN <relation> AS <alias> ON (<on>)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// View or table joined
    pub relation: String,

    pub alias: String,

    pub on: String,
}

impl View {
    pub fn new(
        name: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> View {
        View {
            name: name.into(),
            schema: schema.into(),
            table: table.into(),
            columns: vec![],
            joins: vec![],
            depends_on: IndexSet::new(),
        }
    }
}

/// One view per object table, in table order.
pub(crate) fn build(
    schema: &ResolvedSchema,
    formulas: &IndexMap<FieldId, CompiledFormula>,
) -> Vec<View> {
    let mut views = vec![];

    for table in &schema.app.tables {
        let db_table = schema.db_table(table.id);
        let mut view = View::new(table.view_name(), &db_table.schema, &db_table.name);

        for field in table.formula_fields() {
            let Some(formula) = formulas.get(&field.id) else {
                continue;
            };

            view.columns.push(formula.sql.clone());

            for join in &formula.joins {
                if !view.joins.iter().any(|existing| existing.alias == join.alias) {
                    view.joins.push(join.clone());
                }
            }

            for dependency in &formula.depends_on {
                if *dependency != view.name {
                    view.depends_on.insert(dependency.clone());
                }
            }
        }

        views.push(view);
    }

    views
}
