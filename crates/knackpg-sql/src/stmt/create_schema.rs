use super::Statement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchema {
    pub name: String,
}

impl Statement {
    pub fn create_schema(name: &str) -> Self {
        CreateSchema {
            name: name.to_string(),
        }
        .into()
    }
}

impl From<CreateSchema> for Statement {
    fn from(value: CreateSchema) -> Self {
        Self::CreateSchema(value)
    }
}
