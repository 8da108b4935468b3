use crate::schema::app::{
    self, Aggregate, AggregateMethod, Concatenation, Connection, Field, FieldId, FieldTy, Standard,
};
use crate::schema::db::{DefaultValue, Type};
use crate::schema::raw::{RawField, RawObject};
use crate::schema::{Name, TableId};
use crate::{Error, Result, Severity};

use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

pub(super) struct Built {
    pub(super) table: app::Table,

    /// Fields left out of the table, by key
    pub(super) skipped: Vec<Skipped>,
}

pub(super) struct Skipped {
    pub(super) field: String,
    pub(super) severity: Severity,
    pub(super) error: Error,
}

/// Builds the table for one source object.
///
/// An unknown field type fails the whole table. Malformed formula or
/// connection settings only drop their field.
pub(super) fn build(id: TableId, object: &RawObject) -> Result<Built> {
    let mut fields = vec![];
    let mut skipped = vec![];
    let mut seen = HashSet::new();

    for raw in &object.fields {
        if !seen.insert(raw.key.as_str()) {
            debug!(
                "object `{}`: ignoring duplicate definition of `{}`",
                object.key, raw.key
            );
            continue;
        }

        let ty = match classify(raw) {
            Ok(Some(ty)) => ty,
            Ok(None) => {
                skipped.push(Skipped {
                    field: raw.key.clone(),
                    severity: Severity::Warning,
                    error: Error::unsupported_feature(format!(
                        "`{}` fields are not compiled (field `{}`)",
                        raw.ty, raw.key
                    )),
                });
                continue;
            }
            Err(err) if err.is_unsupported_field_type() => return Err(err),
            Err(error) => {
                skipped.push(Skipped {
                    field: raw.key.clone(),
                    severity: Severity::Error,
                    error,
                });
                continue;
            }
        };

        fields.push(Field {
            id: FieldId {
                table: id,
                index: fields.len(),
            },
            key: raw.key.clone(),
            name: Name::new(&raw.name),
            ty,
            synthetic: false,
            raw: raw.rest.clone(),
        });
    }

    let index = fields.len();
    fields.push(surrogate_key(FieldId { table: id, index }));
    fields.push(natural_key(FieldId {
        table: id,
        index: index + 1,
    }));

    let table = app::Table {
        id,
        key: object.key.clone(),
        name: Name::new(&object.name),
        fields,
    };

    verify_field_names(&table)?;
    Ok(Built { table, skipped })
}

/// Routes a raw field to its variant. `Ok(None)` means the type is known but
/// has no compiled form.
fn classify(raw: &RawField) -> Result<Option<FieldTy>> {
    match raw.ty.as_str() {
        "connection" => return connection(raw).map(|ty| Some(FieldTy::Connection(ty))),
        "concatenation" => return concatenation(raw).map(|ty| Some(FieldTy::Concatenation(ty))),
        "equation" => return Ok(None),
        _ => {}
    }

    if let Some(method) = AggregateMethod::from_source(&raw.ty) {
        return aggregate(raw, method).map(|ty| Some(FieldTy::Aggregate(ty)));
    }

    let Some(storage_ty) = Type::from_source(&raw.ty) else {
        return Err(Error::unsupported_field_type(&raw.key, &raw.ty));
    };

    Ok(Some(FieldTy::Standard(standard(raw, storage_ty))))
}

fn standard(raw: &RawField, mut storage_ty: Type) -> Standard {
    let mut input_type = raw.ty.clone();
    let mut options = None;

    if raw.ty == "multiple_choice" {
        if let Some(style) = raw.format_key("type").and_then(Value::as_str) {
            input_type = style.to_string();

            if style == "multi" {
                storage_ty = storage_ty.array();
            }
        }

        options = raw.format_key("options").and_then(Value::as_array).map(|options| {
            options
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        });
    }

    let default = default_value(raw, &storage_ty);

    Standard {
        source_type: raw.ty.clone(),
        input_type,
        storage_ty,
        default,
        nullable: !raw.required,
        unique: raw.unique,
        primary_key: false,
        options,
    }
}

fn default_value(raw: &RawField, ty: &Type) -> Option<DefaultValue> {
    let value = raw.default.as_ref()?;

    let text = match value {
        Value::Null => return None,
        Value::String(s) if s.is_empty() || s == "kn-blank" => return None,
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => {
            debug!("field `{}`: ignoring structured default", raw.key);
            return None;
        }
    };

    let default = match ty {
        Type::Json | Type::Array(_) | Type::TimestampTz | Type::Serial => None,
        Type::Boolean => match text.as_str() {
            "true" => Some(DefaultValue::Bool(true)),
            "false" => Some(DefaultValue::Bool(false)),
            _ => None,
        },
        Type::Numeric | Type::Integer => text
            .parse::<f64>()
            .ok()
            .map(|_| DefaultValue::Number(text.clone())),
        Type::Text => Some(DefaultValue::Text(text.clone())),
    };

    if default.is_none() {
        debug!("field `{}`: dropping default `{text}` for {ty} column", raw.key);
    }

    default
}

fn connection(raw: &RawField) -> Result<Connection> {
    let relationship = raw.relationship().ok_or_else(|| {
        Error::invalid_metadata(format!(
            "connection field `{}` has no relationship",
            raw.key
        ))
    })?;

    Ok(Connection {
        target: relationship.object,
        has: relationship.has,
        belongs_to: relationship.belongs_to,
    })
}

fn aggregate(raw: &RawField, method: AggregateMethod) -> Result<Aggregate> {
    // `count` stores the connection as a bare key, the others as `{key}`
    let connection = raw.format_key("connection").and_then(key_of).ok_or_else(|| {
        Error::invalid_metadata(format!(
            "{} field `{}` names no connection",
            raw.ty, raw.key
        ))
    })?;

    let target = raw.format_key("field").and_then(key_of);

    if target.is_none() && !method.is_count() {
        return Err(Error::invalid_metadata(format!(
            "{} field `{}` names no target field",
            raw.ty, raw.key
        )));
    }

    Ok(Aggregate {
        method,
        connection,
        target,
    })
}

fn concatenation(raw: &RawField) -> Result<Concatenation> {
    let equation = raw
        .format_key("equation")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::invalid_metadata(format!(
                "concatenation field `{}` has no equation",
                raw.key
            ))
        })?;

    Ok(Concatenation {
        equation: equation.to_string(),
    })
}

fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(key) => Some(key.clone()),
        Value::Object(map) => map.get("key")?.as_str().map(str::to_string),
        _ => None,
    }
}

fn surrogate_key(id: FieldId) -> Field {
    synthetic(
        id,
        "id",
        Standard {
            source_type: "_pg_primary_key".to_string(),
            input_type: "_pg_primary_key".to_string(),
            storage_ty: Type::Serial,
            default: None,
            nullable: false,
            unique: false,
            primary_key: true,
            options: None,
        },
    )
}

fn natural_key(id: FieldId) -> Field {
    synthetic(
        id,
        "knack_id",
        Standard {
            source_type: "_knack_id".to_string(),
            input_type: "_knack_id".to_string(),
            storage_ty: Type::Text,
            default: None,
            nullable: true,
            unique: true,
            primary_key: false,
            options: None,
        },
    )
}

fn synthetic(id: FieldId, name: &str, standard: Standard) -> Field {
    Field {
        id,
        key: name.to_string(),
        name: Name::synthetic(name),
        ty: FieldTy::Standard(standard),
        synthetic: true,
        raw: Map::new(),
    }
}

fn verify_field_names(table: &app::Table) -> Result<()> {
    let mut names: IndexMap<&str, &str> = IndexMap::new();

    for field in &table.fields {
        if let Some(first) = names.insert(&field.name.ident, &field.name.label) {
            return Err(Error::identifier_collision(
                &table.name.ident,
                first,
                &field.name.label,
                &field.name.ident,
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(fields: Value) -> RawObject {
        serde_json::from_value(json!({
            "key": "object_1",
            "name": "Work Orders",
            "fields": fields,
        }))
        .unwrap()
    }

    fn build_one(fields: Value) -> Result<Built> {
        build(TableId(0), &object(fields))
    }

    fn storage_ty(table: &app::Table, key: &str) -> Type {
        table
            .field_by_key(key)
            .unwrap()
            .as_standard()
            .unwrap()
            .storage_ty
            .clone()
    }

    #[test]
    fn synthetic_keys_come_last() {
        let table = build_one(json!([
            {"key": "field_1", "name": "Title", "type": "short_text"},
        ]))
        .unwrap()
        .table;

        let names: Vec<_> = table.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["title", "id", "knack_id"]);
        assert!(table.fields[1].as_standard().unwrap().primary_key);
        assert!(table.fields[2].as_standard().unwrap().unique);
        assert_eq!(table.fields[1].id.index, 1);
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let built = build_one(json!([
            {"key": "field_1", "name": "Title", "type": "short_text"},
            {"key": "field_1", "name": "Title Again", "type": "number"},
        ]))
        .unwrap();

        assert_eq!(built.table.domain_fields().count(), 1);
        assert_eq!(storage_ty(&built.table, "field_1"), Type::Text);
        assert!(built.skipped.is_empty());
    }

    #[test]
    fn multi_choice_is_array() {
        let table = build_one(json!([
            {"key": "field_1", "name": "Tags", "type": "multiple_choice",
             "format": {"type": "multi", "options": ["a", "b"]}},
            {"key": "field_2", "name": "Status", "type": "multiple_choice",
             "format": {"type": "single", "options": ["open"]}},
        ]))
        .unwrap()
        .table;

        assert_eq!(storage_ty(&table, "field_1"), Type::Text.array());
        assert_eq!(storage_ty(&table, "field_2"), Type::Text);

        let tags = table.field_by_key("field_1").unwrap().as_standard().unwrap();
        assert_eq!(tags.input_type, "multi");
        assert_eq!(
            tags.options,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn unknown_type_fails_table() {
        let err = build_one(json!([
            {"key": "field_1", "name": "Title", "type": "short_text"},
            {"key": "field_2", "name": "Hologram", "type": "hologram"},
        ]))
        .err()
        .unwrap();

        assert!(err.is_unsupported_field_type());
    }

    #[test]
    fn equation_is_skipped_with_warning() {
        let built = build_one(json!([
            {"key": "field_1", "name": "Total", "type": "equation",
             "format": {"equation": "{field_2} * 2"}},
        ]))
        .unwrap();

        assert_eq!(built.table.domain_fields().count(), 0);
        assert_eq!(built.skipped.len(), 1);
        assert_eq!(built.skipped[0].severity, Severity::Warning);
        assert!(built.skipped[0].error.is_unsupported_feature());
    }

    #[test]
    fn defaults() {
        let table = build_one(json!([
            {"key": "field_1", "name": "A", "type": "short_text", "default": "it's"},
            {"key": "field_2", "name": "B", "type": "short_text", "default": "kn-blank"},
            {"key": "field_3", "name": "C", "type": "boolean", "default": false},
            {"key": "field_4", "name": "D", "type": "number", "default": "12.5"},
            {"key": "field_5", "name": "E", "type": "address", "default": "Main St"},
            {"key": "field_6", "name": "F", "type": "number", "default": "many"},
        ]))
        .unwrap()
        .table;

        let default = |key: &str| {
            table
                .field_by_key(key)
                .unwrap()
                .as_standard()
                .unwrap()
                .default
                .clone()
        };

        assert_eq!(default("field_1"), Some(DefaultValue::Text("it's".into())));
        assert_eq!(default("field_2"), None);
        assert_eq!(default("field_3"), Some(DefaultValue::Bool(false)));
        assert_eq!(default("field_4"), Some(DefaultValue::Number("12.5".into())));
        assert_eq!(default("field_5"), None);
        assert_eq!(default("field_6"), None);
    }

    #[test]
    fn aggregate_settings() {
        let table = build_one(json!([
            {"key": "field_1", "name": "Items", "type": "count",
             "format": {"connection": "field_9"}},
            {"key": "field_2", "name": "Total", "type": "sum",
             "format": {"connection": {"key": "field_9"}, "field": {"key": "field_7"}}},
        ]))
        .unwrap()
        .table;

        let FieldTy::Aggregate(count) = &table.fields[0].ty else {
            panic!("expected aggregate");
        };
        assert_eq!(count.connection, "field_9");
        assert_eq!(count.target, None);

        let FieldTy::Aggregate(sum) = &table.fields[1].ty else {
            panic!("expected aggregate");
        };
        assert_eq!(sum.method, AggregateMethod::Sum);
        assert_eq!(sum.target.as_deref(), Some("field_7"));
    }

    #[test]
    fn bad_settings_drop_the_field() {
        let built = build_one(json!([
            {"key": "field_1", "name": "Owner", "type": "connection"},
            {"key": "field_2", "name": "Total", "type": "sum",
             "format": {"connection": "field_9"}},
            {"key": "field_3", "name": "Title", "type": "short_text"},
        ]))
        .unwrap();

        assert_eq!(built.table.domain_fields().count(), 1);
        assert_eq!(built.table.fields[0].key, "field_3");
        assert_eq!(built.table.fields[0].id.index, 0);

        let skipped: Vec<_> = built.skipped.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(skipped, ["field_1", "field_2"]);
        assert!(built
            .skipped
            .iter()
            .all(|s| s.severity == Severity::Error && s.error.is_invalid_metadata()));
    }

    #[test]
    fn colliding_names() {
        let err = build_one(json!([
            {"key": "field_1", "name": "2-A", "type": "short_text"},
            {"key": "field_2", "name": "2$A", "type": "short_text"},
        ]))
        .err()
        .unwrap();

        assert!(err.is_identifier_collision());
        assert_eq!(
            err.to_string(),
            "identifier collision in `work_orders`: `2-A` and `2$A` both sanitize to `_2_a`"
        );
    }
}
