//! Tolerant shaping of a raw document into the schema IR.
//!
//! Normalization never rejects a document for content problems; its one
//! error is the absence of an `entities` array. Everything else is coerced:
//! unknown data types become `string`, unknown relationship kinds become
//! `1:N`, non-object list items are dropped, and missing flags take their
//! documented defaults. Content problems are the validator's job, and the
//! validator wants a well-shaped IR to point at.
//!
//! Field lookup accepts both the camelCase wire spelling and the snake_case
//! spelling the upstream service tends to emit, wire spelling winning when
//! both are present.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::NormalizeError;
use crate::intake::RawDocument;
use crate::schema::{Attribute, DataType, Entity, Relationship, RelationshipKind, Schema};

/// Shape a raw document into the canonical IR.
pub fn normalize(doc: RawDocument) -> Result<Schema, NormalizeError> {
    let Value::Object(root) = doc.into_value() else {
        return Err(NormalizeError::MissingEntities);
    };

    let Some(Value::Array(raw_entities)) = root.get("entities") else {
        return Err(NormalizeError::MissingEntities);
    };

    let entities: Vec<Entity> = raw_entities
        .iter()
        .filter_map(Value::as_object)
        .map(normalize_entity)
        .collect();

    let relationships: Vec<Relationship> = match root.get("relationships") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(normalize_relationship)
            .collect(),
        _ => Vec::new(),
    };

    let metadata = match root.get("metadata") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    let schema = Schema {
        project_name: string_field(&root, "projectName", "project_name"),
        entities,
        relationships,
        metadata,
    };
    debug!(
        entities = schema.entities.len(),
        relationships = schema.relationships.len(),
        "Normalized document"
    );
    Ok(schema)
}

fn normalize_entity(map: &Map<String, Value>) -> Entity {
    let attributes = match map.get("attributes") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(normalize_attribute)
            .collect(),
        _ => Vec::new(),
    };
    Entity {
        name: string_at(map, "name").unwrap_or_default(),
        attributes,
        table_name: string_field(map, "tableName", "table_name"),
    }
}

fn normalize_attribute(map: &Map<String, Value>) -> Attribute {
    let data_type = match field(map, "dataType", "data_type").and_then(Value::as_str) {
        Some(raw) => DataType::parse(raw).unwrap_or_else(|| {
            debug!(raw, "Unrecognized data type, coercing to string");
            DataType::String
        }),
        None => DataType::default(),
    };
    // An explicit JSON null means "no default", same as absence.
    let default_value = field(map, "defaultValue", "default_value")
        .filter(|v| !v.is_null())
        .cloned();
    Attribute {
        name: string_at(map, "name").unwrap_or_default(),
        data_type,
        is_primary_key: bool_field(map, "isPrimaryKey", "is_primary_key", false),
        is_foreign_key: bool_field(map, "isForeignKey", "is_foreign_key", false),
        is_nullable: bool_field(map, "isNullable", "is_nullable", true),
        is_unique: bool_field(map, "isUnique", "is_unique", false),
        max_length: field(map, "maxLength", "max_length").and_then(Value::as_i64),
        default_value,
        references_table: string_field(map, "referencesTable", "references_table"),
        references_column: string_field(map, "referencesColumn", "references_column"),
    }
}

fn normalize_relationship(map: &Map<String, Value>) -> Relationship {
    let relationship_type =
        match field(map, "relationshipType", "relationship_type").and_then(Value::as_str) {
            Some(raw) => RelationshipKind::parse(raw).unwrap_or_else(|| {
                debug!(raw, "Unrecognized relationship kind, coercing to 1:N");
                RelationshipKind::OneToMany
            }),
            None => RelationshipKind::default(),
        };
    Relationship {
        name: string_at(map, "name"),
        source_entity: string_field(map, "sourceEntity", "source_entity").unwrap_or_default(),
        target_entity: string_field(map, "targetEntity", "target_entity").unwrap_or_default(),
        relationship_type,
        source_cardinality: string_field(map, "sourceCardinality", "source_cardinality"),
        target_cardinality: string_field(map, "targetCardinality", "target_cardinality"),
    }
}

/// Look up a field under its wire spelling first, then the upstream one.
fn field<'a>(map: &'a Map<String, Value>, wire: &str, upstream: &str) -> Option<&'a Value> {
    map.get(wire).or_else(|| map.get(upstream))
}

/// Single-key string lookup; empty strings count as absent.
fn string_at(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Dual-spelling string lookup.
fn string_field(map: &Map<String, Value>, wire: &str, upstream: &str) -> Option<String> {
    string_at(map, wire).or_else(|| string_at(map, upstream))
}

fn bool_field(map: &Map<String, Value>, wire: &str, upstream: &str, default: bool) -> bool {
    field(map, wire, upstream)
        .and_then(Value::as_bool)
        .unwrap_or(default)
}
