//! The application metadata as it arrives from the source system.
//!
//! Only the keys the compiler interprets are named. Everything else on a field
//! is kept in [`RawField::rest`] so later stages can still inspect it.

use crate::Result;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSchema {
    #[serde(default)]
    pub objects: Vec<RawObject>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawObject {
    pub key: String,
    pub name: String,

    #[serde(default)]
    pub fields: Vec<RawField>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawField {
    pub key: String,
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(default)]
    pub format: Option<Value>,

    #[serde(default)]
    pub relationship: Option<RawRelationship>,

    /// Keys the compiler does not interpret (validation rules, display
    /// settings, ...).
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawRelationship {
    pub object: String,
    pub has: Cardinality,
    pub belongs_to: Cardinality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

impl RawSchema {
    pub fn from_json(src: &str) -> Result<RawSchema> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn from_value(value: Value) -> Result<RawSchema> {
        Ok(serde_json::from_value(value)?)
    }
}

impl RawField {
    /// Looks up a key inside `format`, if the field has one.
    pub fn format_key(&self, key: &str) -> Option<&Value> {
        self.format.as_ref()?.as_object()?.get(key)
    }

    /// The declared relationship of a connection field.
    ///
    /// Older metadata only carries it under `format.connection`.
    pub fn relationship(&self) -> Option<RawRelationship> {
        if let Some(relationship) = &self.relationship {
            return Some(relationship.clone());
        }

        let connection = self.format_key("connection")?;
        connection.get("object")?;
        serde_json::from_value(connection.clone()).ok()
    }
}

impl Cardinality {
    pub fn is_one(self) -> bool {
        matches!(self, Cardinality::One)
    }

    pub fn is_many(self) -> bool {
        matches!(self, Cardinality::Many)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_keys_are_kept() {
        let field: RawField = serde_json::from_value(json!({
            "key": "field_1",
            "name": "Name",
            "type": "short_text",
            "rules": [{"criteria": []}],
            "sortable": true,
        }))
        .unwrap();

        assert_eq!(field.ty, "short_text");
        assert!(!field.required);
        assert!(field.rest.contains_key("rules"));
        assert!(field.rest.contains_key("sortable"));
        assert!(!field.rest.contains_key("type"));
    }

    #[test]
    fn relationship_falls_back_to_format() {
        let field: RawField = serde_json::from_value(json!({
            "key": "field_2",
            "name": "Owner",
            "type": "connection",
            "format": {
                "connection": {"object": "object_3", "has": "many", "belongs_to": "one"}
            },
        }))
        .unwrap();

        let relationship = field.relationship().unwrap();
        assert_eq!(relationship.object, "object_3");
        assert!(relationship.has.is_many());
        assert!(relationship.belongs_to.is_one());
    }

    #[test]
    fn top_level_extras_are_ignored() {
        let schema = RawSchema::from_json(r#"{"objects": [], "scenes": [{"key": "scene_1"}]}"#)
            .unwrap();
        assert!(schema.objects.is_empty());
    }

    #[test]
    fn bad_json_is_invalid_metadata() {
        let err = RawSchema::from_json(r#"{"objects": [{"key": 1}]}"#).unwrap_err();
        assert!(err.is_invalid_metadata());
    }
}
