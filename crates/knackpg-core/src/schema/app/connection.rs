use crate::schema::raw::Cardinality;

/// A field linking records of its table to records of another table.
///
/// `has` is the cardinality on the field's own side and `belongs_to` the
/// cardinality on the other side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Object key of the connected table
    pub target: String,

    pub has: Cardinality,

    pub belongs_to: Cardinality,
}

impl Connection {
    pub fn is_many_to_many(&self) -> bool {
        self.has.is_many() && self.belongs_to.is_many()
    }

    pub fn is_one_to_many(&self) -> bool {
        self.has.is_one() && self.belongs_to.is_many()
    }

    pub fn is_many_to_one(&self) -> bool {
        self.has.is_many() && self.belongs_to.is_one()
    }
}
