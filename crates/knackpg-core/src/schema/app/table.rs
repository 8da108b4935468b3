use super::{Field, FieldId, Name, TableId};

/// A source object, compiled into one table and one view.
#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,

    /// The source system's object key (`object_4`)
    pub key: String,

    pub name: Name,

    /// Domain fields in source order, then the surrogate key and the natural
    /// key.
    pub fields: Vec<Field>,
}

impl Table {
    pub fn field(&self, id: FieldId) -> &Field {
        debug_assert_eq!(self.id, id.table);
        &self.fields[id.index]
    }

    pub fn field_by_key(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn domain_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| !field.synthetic)
    }

    pub fn formula_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.is_formula())
    }

    pub fn view_name(&self) -> String {
        format!("{}_view", self.name.ident)
    }
}
