use super::app::{self, Connection, Field, FieldId, FieldTy};
use super::db::{self, Column, ForeignKey, TableKind, Type};
use super::{ClassifiedSchema, Index, TableId};
use crate::compiled::Diagnostics;
use crate::{Error, Result, Unit};

use indexmap::IndexMap;
use log::debug;

/// The application with every connection materialized in storage.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    pub app: ClassifiedSchema,

    pub index: Index,

    /// Storage tables. Object tables come first, at the index of their id.
    pub tables: Vec<db::Table>,

    pub foreign_keys: Vec<ForeignKey>,

    /// How each successfully resolved connection field is stored
    pub relations: IndexMap<FieldId, Relation>,
}

/// How a connection is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// One column on `holder` holding ids of `referenced`
    Single {
        holder: TableId,
        column: String,
        referenced: TableId,

        /// True if the column holds an array of ids
        array: bool,
    },

    /// Rows of an association table linking both sides
    ManyToMany {
        association: TableId,
        host: TableId,
        target: TableId,
        host_column: String,
        target_column: String,
    },
}

impl Relation {
    /// The table on the other side of the relation, seen from `table`.
    pub fn other(&self, table: TableId) -> Option<TableId> {
        match self {
            Relation::Single {
                holder, referenced, ..
            } => {
                if *holder == table {
                    Some(*referenced)
                } else if *referenced == table {
                    Some(*holder)
                } else {
                    None
                }
            }
            Relation::ManyToMany { host, target, .. } => {
                if *host == table {
                    Some(*target)
                } else if *target == table {
                    Some(*host)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_many_to_many(&self) -> bool {
        matches!(self, Relation::ManyToMany { .. })
    }
}

impl ResolvedSchema {
    pub fn table(&self, id: TableId) -> &app::Table {
        self.app.table(id)
    }

    pub fn field(&self, id: FieldId) -> &Field {
        self.app.field(id)
    }

    pub fn db_table(&self, id: TableId) -> &db::Table {
        &self.tables[id.0]
    }

    pub fn relation(&self, field: FieldId) -> Option<&Relation> {
        self.relations.get(&field)
    }

    /// The column storing `field` on the field's own table, if it has one.
    pub fn column(&self, field: FieldId) -> Option<&Column> {
        self.db_table(field.table)
            .columns
            .iter()
            .find(|column| column.field == Some(field))
    }
}

pub(super) fn resolve(
    app: ClassifiedSchema,
    index: Index,
    data_schema: &str,
    diagnostics: &mut Diagnostics,
) -> Result<ResolvedSchema> {
    let mut resolve = Resolve {
        app: &app,
        index: &index,
        data_schema,
        names: app
            .tables
            .iter()
            .map(|table| {
                table
                    .fields
                    .iter()
                    .map(|field| (field.name.ident.clone(), field.name.label.clone()))
                    .collect()
            })
            .collect(),
        references: vec![vec![]; app.tables.len()],
        associations: IndexMap::new(),
        association_tables: vec![],
        foreign_keys: vec![],
        relations: IndexMap::new(),
    };

    for table in &app.tables {
        for field in &table.fields {
            let FieldTy::Connection(connection) = &field.ty else {
                continue;
            };

            if let Err(err) = resolve.connection(table, field, connection) {
                diagnostics.error(Unit::field(&table.key, &field.key), err)?;
            }
        }
    }

    let Resolve {
        references,
        association_tables,
        foreign_keys,
        relations,
        ..
    } = resolve;

    let mut tables: Vec<_> = app
        .tables
        .iter()
        .zip(references)
        .map(|(table, references)| object_table(table, references, data_schema))
        .collect();
    tables.extend(association_tables);

    Ok(ResolvedSchema {
        app,
        index,
        tables,
        foreign_keys,
        relations,
    })
}

struct Resolve<'a> {
    app: &'a ClassifiedSchema,
    index: &'a Index,
    data_schema: &'a str,

    /// Identifiers taken in each object table, with the label that took them
    names: Vec<IndexMap<String, String>>,

    /// Reference columns each object table receives
    references: Vec<Vec<Column>>,

    /// Association tables by name
    associations: IndexMap<String, TableId>,
    association_tables: Vec<db::Table>,

    foreign_keys: Vec<ForeignKey>,
    relations: IndexMap<FieldId, Relation>,
}

impl Resolve<'_> {
    fn connection(
        &mut self,
        host: &app::Table,
        field: &Field,
        connection: &Connection,
    ) -> Result<()> {
        let target = self
            .app
            .table(self.index.resolve_table(&field.key, &connection.target)?);

        if connection.is_many_to_many() {
            return self.many_to_many(host, field, target);
        }

        // The column goes on the "many" side of a one-to-many. Other one-sided
        // connections store it on the host.
        let (holder, referenced, array) = if connection.is_one_to_many() {
            (target, host, false)
        } else {
            (host, target, connection.is_many_to_one())
        };

        let name = format!("{}_rel_{}_id", field.name.ident, referenced.name.ident);
        self.claim(holder, &field.name.label, &name)?;

        let mut column = Column::new(
            &name,
            if array {
                Type::Integer.array()
            } else {
                Type::Integer
            },
        );
        column.field = Some(field.id);
        self.references[holder.id.0].push(column);

        if !array {
            self.foreign_keys.push(ForeignKey::new(
                &holder.name.ident,
                &name,
                &referenced.name.ident,
            ));
        }

        debug!(
            "{}.{name} -> {} ({})",
            holder.name, referenced.name, field.key
        );

        self.relations.insert(
            field.id,
            Relation::Single {
                holder: holder.id,
                column: name,
                referenced: referenced.id,
                array,
            },
        );

        Ok(())
    }

    fn many_to_many(
        &mut self,
        host: &app::Table,
        field: &Field,
        target: &app::Table,
    ) -> Result<()> {
        let (a, b) = if host.name.ident <= target.name.ident {
            (host, target)
        } else {
            (target, host)
        };

        let name = format!("many_{}_to_many_{}", a.name.ident, b.name.ident);
        let (a_column, b_column) = association_columns(a, b);

        let (host_column, target_column) = if host.id == a.id {
            (a_column, b_column)
        } else {
            (b_column, a_column)
        };

        let association = match self.associations.get(&name) {
            Some(id) => *id,
            None => self.association_table(name, a, b)?,
        };

        self.relations.insert(
            field.id,
            Relation::ManyToMany {
                association,
                host: host.id,
                target: target.id,
                host_column,
                target_column,
            },
        );

        Ok(())
    }

    fn association_table(
        &mut self,
        name: String,
        a: &app::Table,
        b: &app::Table,
    ) -> Result<TableId> {
        if let Some(table) = self.app.tables.iter().find(|table| table.name.ident == name) {
            return Err(Error::identifier_collision(
                "tables",
                &table.name.label,
                &name,
                &name,
            ));
        }

        let id = TableId(self.app.tables.len() + self.association_tables.len());
        let (a_column, b_column) = association_columns(a, b);

        let columns = [(a, a_column), (b, b_column)]
            .into_iter()
            .map(|(side, name)| {
                let mut column = Column::new(name, Type::Integer);
                column.nullable = false;
                column.references = Some(side.name.ident.clone());
                column
            })
            .collect();

        debug!("association table {name} links {} and {}", a.name, b.name);

        self.association_tables.push(db::Table {
            id,
            name: name.clone(),
            schema: self.data_schema.to_string(),
            columns,
            primary_key: vec![0, 1],
            kind: TableKind::Association,
        });
        self.associations.insert(name, id);

        Ok(id)
    }

    /// Reserves a column name on `table` for a reference column.
    fn claim(&mut self, table: &app::Table, label: &str, name: &str) -> Result<()> {
        let names = &mut self.names[table.id.0];

        if let Some(first) = names.get(name) {
            return Err(Error::identifier_collision(
                &table.name.ident,
                first,
                label,
                name,
            ));
        }

        names.insert(name.to_string(), label.to_string());
        Ok(())
    }
}

/// Column names of an association table. A table linked to itself names its
/// second column `related_<table>_id`.
fn association_columns(a: &app::Table, b: &app::Table) -> (String, String) {
    let a_column = format!("{}_id", a.name.ident);

    let b_column = if a.id == b.id {
        format!("related_{}_id", b.name.ident)
    } else {
        format!("{}_id", b.name.ident)
    };

    (a_column, b_column)
}

/// Domain columns in field order, then reference columns, then the surrogate
/// and natural keys.
fn object_table(table: &app::Table, references: Vec<Column>, data_schema: &str) -> db::Table {
    let column = |field: &Field, standard: &app::Standard| Column {
        name: field.name.ident.clone(),
        ty: standard.storage_ty.clone(),
        nullable: standard.nullable,
        unique: standard.unique,
        primary_key: standard.primary_key,
        default: standard.default.clone(),
        references: None,
        field: Some(field.id),
    };

    let mut columns: Vec<_> = table
        .domain_fields()
        .filter_map(|field| field.as_standard().map(|standard| column(field, standard)))
        .collect();

    columns.extend(references);

    columns.extend(
        table
            .fields
            .iter()
            .filter(|field| field.synthetic)
            .filter_map(|field| field.as_standard().map(|standard| column(field, standard))),
    );

    db::Table {
        id: table.id,
        name: table.name.ident.clone(),
        schema: data_schema.to_string(),
        columns,
        primary_key: vec![],
        kind: TableKind::Object,
    }
}
