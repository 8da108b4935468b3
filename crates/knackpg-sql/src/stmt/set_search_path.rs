use super::Statement;

/// Makes unqualified names in later statements resolve to `schemas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSearchPath {
    pub schemas: Vec<String>,
}

impl Statement {
    pub fn set_search_path(schemas: &[&str]) -> Self {
        SetSearchPath {
            schemas: schemas.iter().map(|schema| schema.to_string()).collect(),
        }
        .into()
    }
}

impl From<SetSearchPath> for Statement {
    fn from(value: SetSearchPath) -> Self {
        Self::SetSearchPath(value)
    }
}
