//! Reconciliation of declared foreign-key columns against their targets.
//!
//! Diagram extraction routinely writes the *source* column's spelling into
//! `referencesColumn` (`customer_id` instead of the target's `CustomerID`).
//! The reconciler repairs such references in place when a confident match
//! exists on the target entity and reports every repair as a [`Correction`].
//! References it cannot resolve are left untouched for the validator to
//! report; reconciliation never invents columns and never deletes a
//! reference.
//!
//! Running the reconciler on its own output is a no-op: a repaired column
//! names a real attribute and is skipped on the next pass.

use serde::Serialize;
use tracing::info;

use crate::schema::{Entity, Schema};

/// Which rule produced a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Normalized forms of declared and resolved column are equal.
    Exact,
    /// One normalized form contains the other.
    Substring,
}

/// Record of one in-place foreign-key repair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    /// Entity owning the repaired attribute.
    pub entity: String,
    /// The repaired attribute.
    pub attribute: String,
    /// Entity the reference points at.
    pub references_table: String,
    /// Column spelling as the document declared it.
    pub declared_column: String,
    /// Column spelling after repair, an attribute of the target entity.
    pub resolved_column: String,
    /// Rule that justified the repair.
    pub rule: MatchRule,
}

/// Repair resolvable foreign-key column references in place.
///
/// Corrections come back in entity order, then attribute order within each
/// entity.
pub fn reconcile(schema: &mut Schema) -> Vec<Correction> {
    let mut corrections = Vec::new();
    let mut fixes: Vec<(usize, usize, String)> = Vec::new();

    for (entity_index, entity) in schema.entities.iter().enumerate() {
        for (attr_index, attribute) in entity.attributes.iter().enumerate() {
            let (Some(table), Some(declared)) =
                (&attribute.references_table, &attribute.references_column)
            else {
                continue;
            };
            // Unknown target tables are the validator's finding, not ours.
            let Some(target) = schema.entity(table) else {
                continue;
            };
            if target.attribute(declared).is_some() {
                continue;
            }
            let Some((resolved, rule)) = resolve_column(target, declared) else {
                continue;
            };
            info!(
                entity = %entity.name,
                attribute = %attribute.name,
                declared = %declared,
                resolved = %resolved,
                rule = ?rule,
                "Reconciled foreign-key column"
            );
            corrections.push(Correction {
                entity: entity.name.clone(),
                attribute: attribute.name.clone(),
                references_table: table.clone(),
                declared_column: declared.clone(),
                resolved_column: resolved.clone(),
                rule,
            });
            fixes.push((entity_index, attr_index, resolved));
        }
    }

    for (entity_index, attr_index, resolved) in fixes {
        schema.entities[entity_index].attributes[attr_index].references_column = Some(resolved);
    }
    corrections
}

/// Find the target attribute a declared column most plausibly means.
///
/// Both sides are normalized (lowercased, underscores removed, a trailing
/// `id` stripped); an exact pass over the target's attributes in declared
/// order runs before the substring pass, and an empty normalized form never
/// participates in substring matching.
fn resolve_column(target: &Entity, declared: &str) -> Option<(String, MatchRule)> {
    let needle = normalize_column(declared);
    if needle.is_empty() {
        return None;
    }
    for candidate in &target.attributes {
        if normalize_column(&candidate.name) == needle {
            return Some((candidate.name.clone(), MatchRule::Exact));
        }
    }
    for candidate in &target.attributes {
        let haystack = normalize_column(&candidate.name);
        if haystack.is_empty() {
            continue;
        }
        if haystack.contains(&needle) || needle.contains(&haystack) {
            return Some((candidate.name.clone(), MatchRule::Substring));
        }
    }
    None
}

fn normalize_column(name: &str) -> String {
    let folded = name.to_lowercase().replace('_', "");
    match folded.strip_suffix("id") {
        Some(stem) => stem.to_string(),
        None => folded,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, DataType};

    fn entity(name: &str, attributes: Vec<Attribute>) -> Entity {
        Entity {
            name: name.to_string(),
            attributes,
            table_name: None,
        }
    }

    fn attribute(name: &str) -> Attribute {
        Attribute {
            name: name.to_string(),
            data_type: DataType::Integer,
            ..Attribute::default()
        }
    }

    fn foreign_key(name: &str, table: &str, column: &str) -> Attribute {
        Attribute {
            is_foreign_key: true,
            references_table: Some(table.to_string()),
            references_column: Some(column.to_string()),
            ..attribute(name)
        }
    }

    fn customer_order_schema(declared: &str) -> Schema {
        Schema {
            entities: vec![
                entity(
                    "Customer",
                    vec![
                        Attribute {
                            is_primary_key: true,
                            ..attribute("CustomerID")
                        },
                        attribute("Name"),
                    ],
                ),
                entity(
                    "Order",
                    vec![
                        Attribute {
                            is_primary_key: true,
                            ..attribute("OrderID")
                        },
                        foreign_key("customer_id", "Customer", declared),
                    ],
                ),
            ],
            ..Schema::default()
        }
    }

    #[test]
    fn test_exact_match_repairs_column() {
        let mut schema = customer_order_schema("customer_id");
        let corrections = reconcile(&mut schema);
        assert_eq!(corrections.len(), 1);
        let correction = &corrections[0];
        assert_eq!(correction.entity, "Order");
        assert_eq!(correction.attribute, "customer_id");
        assert_eq!(correction.declared_column, "customer_id");
        assert_eq!(correction.resolved_column, "CustomerID");
        assert_eq!(correction.rule, MatchRule::Exact);
        assert_eq!(
            schema.entities[1].attributes[1].references_column.as_deref(),
            Some("CustomerID")
        );
    }

    #[test]
    fn test_substring_match_repairs_column() {
        let mut schema = customer_order_schema("cust");
        let corrections = reconcile(&mut schema);
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].rule, MatchRule::Substring);
        assert_eq!(corrections[0].resolved_column, "CustomerID");
    }

    #[test]
    fn test_valid_reference_is_untouched() {
        let mut schema = customer_order_schema("CustomerID");
        assert!(reconcile(&mut schema).is_empty());
    }

    #[test]
    fn test_unknown_target_table_is_skipped() {
        let mut schema = customer_order_schema("customer_id");
        schema.entities[1].attributes[1].references_table = Some("Ghost".to_string());
        assert!(reconcile(&mut schema).is_empty());
        assert_eq!(
            schema.entities[1].attributes[1].references_column.as_deref(),
            Some("customer_id")
        );
    }

    #[test]
    fn test_unresolvable_column_is_left_for_validation() {
        let mut schema = customer_order_schema("warehouse_code");
        assert!(reconcile(&mut schema).is_empty());
        assert_eq!(
            schema.entities[1].attributes[1].references_column.as_deref(),
            Some("warehouse_code")
        );
    }

    #[test]
    fn test_empty_normalized_needle_never_matches() {
        // "id" normalizes to the empty string, which must not substring-match
        // every candidate.
        let mut schema = customer_order_schema("id");
        assert!(reconcile(&mut schema).is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut schema = customer_order_schema("customer_id");
        reconcile(&mut schema);
        let repaired = schema.clone();
        assert!(reconcile(&mut schema).is_empty());
        assert_eq!(schema, repaired);
    }

    #[test]
    fn test_corrections_follow_declaration_order() {
        let mut schema = Schema {
            entities: vec![
                entity(
                    "Customer",
                    vec![Attribute {
                        is_primary_key: true,
                        ..attribute("CustomerID")
                    }],
                ),
                entity(
                    "Product",
                    vec![Attribute {
                        is_primary_key: true,
                        ..attribute("ProductID")
                    }],
                ),
                entity(
                    "Order",
                    vec![
                        foreign_key("product_id", "Product", "product_id"),
                        foreign_key("customer_id", "Customer", "customer_id"),
                    ],
                ),
            ],
            ..Schema::default()
        };
        let corrections = reconcile(&mut schema);
        assert_eq!(corrections.len(), 2);
        assert_eq!(corrections[0].attribute, "product_id");
        assert_eq!(corrections[1].attribute, "customer_id");
    }
}
