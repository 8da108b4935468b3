/// A foreign key added to an existing table with `ALTER TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name, `<table>_<column>_fkey`
    pub name: String,

    pub table: String,

    pub column: String,

    /// The referenced table. The constraint always targets its `id`.
    pub references: String,
}

impl ForeignKey {
    pub(crate) fn new(table: &str, column: &str, references: &str) -> ForeignKey {
        ForeignKey {
            name: format!("{table}_{column}_fkey"),
            table: table.to_string(),
            column: column.to_string(),
            references: references.to_string(),
        }
    }
}
