use super::{Name, Statement};

use knackpg_core::schema::db::ForeignKey;

/// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForeignKey {
    pub table: Name,

    /// Constraint name
    pub name: String,

    pub column: String,

    /// The referenced table. The constraint targets its `id`.
    pub references: Name,
}

impl Statement {
    pub fn add_foreign_key(schema: &str, fk: &ForeignKey) -> Self {
        AddForeignKey {
            table: Name::qualified(schema, &fk.table),
            name: fk.name.clone(),
            column: fk.column.clone(),
            references: Name::qualified(schema, &fk.references),
        }
        .into()
    }
}

impl From<AddForeignKey> for Statement {
    fn from(value: AddForeignKey) -> Self {
        Self::AddForeignKey(value)
    }
}
