//! Two-phase schema validation.
//!
//! Findings are data, never errors: the caller decides whether a non-empty
//! error list blocks synthesis. The structural phase checks shape
//! requirements on each piece in isolation; the semantic phase checks
//! cross-references between pieces. Both phases walk entities, then
//! attributes, then relationships, in declared order, so message order is
//! deterministic for a given schema.
//!
//! Unknown data-type tags and relationship kinds cannot reach this module;
//! normalization already coerced them onto the closed enumerations.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::schema::Schema;

/// Outcome of validating one schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    /// True when `errors` is empty; warnings do not block.
    pub valid: bool,
    /// Blocking findings, structural phase first.
    pub errors: Vec<String>,
    /// Advisory findings.
    pub warnings: Vec<String>,
}

/// Validate a schema, returning every finding of both phases.
pub fn validate(schema: &Schema) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    structural(schema, &mut errors);
    semantic(schema, &mut errors, &mut warnings);
    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "Validated schema"
    );
    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Shape requirements, each piece checked in isolation.
fn structural(schema: &Schema, errors: &mut Vec<String>) {
    if schema.entities.is_empty() {
        errors.push("At least one entity is required".to_string());
    }

    for (i, entity) in schema.entities.iter().enumerate() {
        if entity.name.is_empty() {
            errors.push(format!("Entity {}: Name is required", i + 1));
        }
        if entity.attributes.is_empty() {
            errors.push(format!(
                "Entity {}: Must have at least one attribute",
                entity.name
            ));
        }
        for (j, attribute) in entity.attributes.iter().enumerate() {
            if attribute.name.is_empty() {
                errors.push(format!(
                    "Entity {}, Attribute {}: Name is required",
                    entity.name,
                    j + 1
                ));
            }
            if attribute.max_length.is_some_and(|l| l <= 0) {
                errors.push(format!(
                    "Entity {}, Attribute {}: max_length must be positive",
                    entity.name, attribute.name
                ));
            }
        }
    }

    for (i, relationship) in schema.relationships.iter().enumerate() {
        if relationship.source_entity.is_empty() {
            errors.push(format!("Relationship {}: Source entity is required", i + 1));
        }
        if relationship.target_entity.is_empty() {
            errors.push(format!("Relationship {}: Target entity is required", i + 1));
        }
    }
}

/// Cross-reference requirements between pieces.
fn semantic(schema: &Schema, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let mut entity_names: HashSet<&str> = HashSet::new();
    for entity in &schema.entities {
        // Empty names were already reported structurally.
        if !entity.name.is_empty() && !entity_names.insert(&entity.name) {
            errors.push(format!("Duplicate entity name: {}", entity.name));
        }

        let mut attribute_names: HashSet<&str> = HashSet::new();
        for attribute in &entity.attributes {
            if !attribute.name.is_empty() && !attribute_names.insert(&attribute.name) {
                errors.push(format!(
                    "Entity {}: Duplicate attribute name: {}",
                    entity.name, attribute.name
                ));
            }

            if let Some(table) = &attribute.references_table {
                let Some(target) = schema.entity(table) else {
                    errors.push(format!(
                        "Entity {}, Attribute {}: Referenced table '{}' does not exist",
                        entity.name, attribute.name, table
                    ));
                    continue;
                };
                // An absent column means the target's identity column.
                if let Some(column) = &attribute.references_column
                    && target.attribute(column).is_none()
                {
                    errors.push(format!(
                        "Entity {}, Attribute {}: Referenced column '{}' does not exist in table '{}'",
                        entity.name, attribute.name, column, table
                    ));
                }
            }
        }
    }

    for (i, relationship) in schema.relationships.iter().enumerate() {
        if !relationship.source_entity.is_empty()
            && relationship.source_entity == relationship.target_entity
        {
            errors.push(format!(
                "Relationship {}: Self-referencing relationships are not allowed",
                i + 1
            ));
        }
    }

    for entity in &schema.entities {
        if !entity.attributes.is_empty() && !entity.has_primary_key() {
            warnings.push(format!("Entity {}: No primary key defined", entity.name));
        }
    }

    let related: HashSet<&str> = schema
        .relationships
        .iter()
        .flat_map(|r| [r.source_entity.as_str(), r.target_entity.as_str()])
        .collect();
    for entity in &schema.entities {
        if !related.contains(entity.name.as_str()) {
            warnings.push(format!("Entity {}: No relationships defined", entity.name));
        }
    }
}
