//! Canonical schema intermediate representation.
//!
//! The IR is produced by [`normalize`](crate::normalize), repaired by
//! [`reconcile`](crate::reconcile), checked by [`validate`](crate::validate)
//! and consumed read-only by [`synth`](crate::synth). It serializes to the
//! camelCase wire contract used by adjacent tooling.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::names;

/// Closed set of attribute data types the pipeline recognizes.
///
/// The members mirror everything the upstream image-understanding service is
/// known to emit; anything outside the set is coerced to `String` during
/// normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Short character data, the coercion default.
    #[default]
    String,
    /// 32-bit integer.
    Integer,
    /// Single-precision floating point.
    Float,
    /// True/false flag.
    Boolean,
    /// Calendar date without time of day.
    Date,
    /// Date with time of day.
    DateTime,
    /// Unbounded character data.
    Text,
    /// Structured JSON document.
    Json,
    /// Universally unique identifier.
    Uuid,
    /// Exact-precision decimal number.
    Decimal,
    /// Closed set of named values.
    Enum,
    /// Ordered collection.
    Array,
    /// Time of day without a date.
    Time,
    /// Large binary object.
    Blob,
    /// Raw binary data.
    Binary,
    /// Fixed-length character data.
    Char,
    /// Variable-length character data.
    VarChar,
    /// Very large character data.
    LongText,
    /// 8-bit integer.
    TinyInt,
    /// 16-bit integer.
    SmallInt,
    /// 64-bit integer.
    BigInt,
    /// Double-precision floating point.
    Double,
    /// Platform real number.
    Real,
    /// Instant in time, timezone-free.
    Timestamp,
    /// Calendar year.
    Year,
    /// Unordered collection of named values.
    Set,
}

impl DataType {
    /// Every member of the closed enumeration, in wire-tag order.
    pub const ALL: [Self; 26] = [
        Self::String,
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Date,
        Self::DateTime,
        Self::Text,
        Self::Json,
        Self::Uuid,
        Self::Decimal,
        Self::Enum,
        Self::Array,
        Self::Time,
        Self::Blob,
        Self::Binary,
        Self::Char,
        Self::VarChar,
        Self::LongText,
        Self::TinyInt,
        Self::SmallInt,
        Self::BigInt,
        Self::Double,
        Self::Real,
        Self::Timestamp,
        Self::Year,
        Self::Set,
    ];

    /// The lowercase wire tag for this type.
    pub fn tag(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Text => "text",
            Self::Json => "json",
            Self::Uuid => "uuid",
            Self::Decimal => "decimal",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Time => "time",
            Self::Blob => "blob",
            Self::Binary => "binary",
            Self::Char => "char",
            Self::VarChar => "varchar",
            Self::LongText => "longtext",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::BigInt => "bigint",
            Self::Double => "double",
            Self::Real => "real",
            Self::Timestamp => "timestamp",
            Self::Year => "year",
            Self::Set => "set",
        }
    }

    /// Case-insensitive match against the closed set.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.tag() == needle)
    }
}

/// Closed set of relationship kinds.
///
/// Kept deliberately redundant: the identifying/optionality flavors are
/// distinct members because the upstream service emits them as distinct
/// labels and adjacent tooling expects them back unchanged. Pure alternate
/// spellings (`N:N`, `1:M`, word forms) are folded onto these during
/// normalization instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// One-to-one.
    #[serde(rename = "1:1")]
    OneToOne,
    /// One-to-many, the coercion default.
    #[default]
    #[serde(rename = "1:N")]
    OneToMany,
    /// Many-to-one.
    #[serde(rename = "N:1")]
    ManyToOne,
    /// Many-to-many.
    #[serde(rename = "M:N")]
    ManyToMany,
    /// One-to-one where the child's identity depends on the parent.
    #[serde(rename = "1:1 (Identifying)")]
    OneToOneIdentifying,
    /// One-to-one with independent identities.
    #[serde(rename = "1:1 (Non-Identifying)")]
    OneToOneNonIdentifying,
    /// One-to-many where the child's identity depends on the parent.
    #[serde(rename = "1:N (Identifying)")]
    OneToManyIdentifying,
    /// One-to-many with independent identities.
    #[serde(rename = "1:N (Non-Identifying)")]
    OneToManyNonIdentifying,
    /// Many-to-one where the child's identity depends on the parent.
    #[serde(rename = "N:1 (Identifying)")]
    ManyToOneIdentifying,
    /// Many-to-one with independent identities.
    #[serde(rename = "N:1 (Non-Identifying)")]
    ManyToOneNonIdentifying,
    /// Many-to-many with identifying junction rows.
    #[serde(rename = "M:N (Identifying)")]
    ManyToManyIdentifying,
    /// Many-to-many with independent identities.
    #[serde(rename = "M:N (Non-Identifying)")]
    ManyToManyNonIdentifying,
    /// One-to-many with an optional child side.
    #[serde(rename = "1:N (Optional)")]
    OneToManyOptional,
    /// One-to-many with a required child side.
    #[serde(rename = "1:N (Required)")]
    OneToManyRequired,
    /// Many-to-one with an optional parent side.
    #[serde(rename = "N:1 (Optional)")]
    ManyToOneOptional,
    /// Many-to-one with a required parent side.
    #[serde(rename = "N:1 (Required)")]
    ManyToOneRequired,
}

impl RelationshipKind {
    /// Every member of the closed enumeration.
    pub const ALL: [Self; 16] = [
        Self::OneToOne,
        Self::OneToMany,
        Self::ManyToOne,
        Self::ManyToMany,
        Self::OneToOneIdentifying,
        Self::OneToOneNonIdentifying,
        Self::OneToManyIdentifying,
        Self::OneToManyNonIdentifying,
        Self::ManyToOneIdentifying,
        Self::ManyToOneNonIdentifying,
        Self::ManyToManyIdentifying,
        Self::ManyToManyNonIdentifying,
        Self::OneToManyOptional,
        Self::OneToManyRequired,
        Self::ManyToOneOptional,
        Self::ManyToOneRequired,
    ];

    /// The canonical label for this kind, as serialized on the wire.
    pub fn label(self) -> &'static str {
        match self {
            Self::OneToOne => "1:1",
            Self::OneToMany => "1:N",
            Self::ManyToOne => "N:1",
            Self::ManyToMany => "M:N",
            Self::OneToOneIdentifying => "1:1 (Identifying)",
            Self::OneToOneNonIdentifying => "1:1 (Non-Identifying)",
            Self::OneToManyIdentifying => "1:N (Identifying)",
            Self::OneToManyNonIdentifying => "1:N (Non-Identifying)",
            Self::ManyToOneIdentifying => "N:1 (Identifying)",
            Self::ManyToOneNonIdentifying => "N:1 (Non-Identifying)",
            Self::ManyToManyIdentifying => "M:N (Identifying)",
            Self::ManyToManyNonIdentifying => "M:N (Non-Identifying)",
            Self::OneToManyOptional => "1:N (Optional)",
            Self::OneToManyRequired => "1:N (Required)",
            Self::ManyToOneOptional => "N:1 (Optional)",
            Self::ManyToOneRequired => "N:1 (Required)",
        }
    }

    /// Match a kind label, canonical spellings first, then the alternate
    /// spellings the upstream service is known to emit.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim();
        if let Some(kind) = Self::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(needle))
        {
            return Some(kind);
        }
        let folded: String = needle
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match folded.as_str() {
            "n:n" | "m:m" | "manytomany" => Some(Self::ManyToMany),
            "1:m" | "onetomany" => Some(Self::OneToMany),
            "m:1" | "manytoone" => Some(Self::ManyToOne),
            "onetoone" => Some(Self::OneToOne),
            _ => None,
        }
    }
}

/// One column/field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Attribute name, unique within its entity.
    pub name: String,
    /// Data type tag.
    pub data_type: DataType,
    /// Whether the attribute is part of the primary key.
    #[serde(default)]
    pub is_primary_key: bool,
    /// Whether the attribute references another entity.
    #[serde(default)]
    pub is_foreign_key: bool,
    /// Whether the column accepts null; absent means nullable.
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    /// Whether values must be unique.
    #[serde(default)]
    pub is_unique: bool,
    /// Maximum character length, for types that take one. Signed so that a
    /// nonsensical upstream value survives into validation, which rejects
    /// anything non-positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    /// Default value, passed through as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Entity a foreign key points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references_table: Option<String>,
    /// Attribute a foreign key points at on the referenced entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references_column: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: DataType::default(),
            is_primary_key: false,
            is_foreign_key: false,
            is_nullable: true,
            is_unique: false,
            max_length: None,
            default_value: None,
            references_table: None,
            references_column: None,
        }
    }
}

/// One entity of the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Entity name, unique within the schema.
    pub name: String,
    /// Attributes in declaration order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Explicit storage table name, overriding the derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl Entity {
    /// Storage-facing table name: the explicit override when present, else
    /// snake_case of the entity name.
    pub fn storage_name(&self) -> String {
        self.table_name
            .clone()
            .unwrap_or_else(|| names::snake_case(&self.name))
    }

    /// Look up an attribute by exact name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Whether any attribute is flagged as primary key.
    pub fn has_primary_key(&self) -> bool {
        self.attributes.iter().any(|a| a.is_primary_key)
    }

    /// Name of the identity column: the first primary-key attribute, else
    /// the implicit `id` the synthesizer appends.
    pub fn identity_column(&self) -> &str {
        self.attributes
            .iter()
            .find(|a| a.is_primary_key)
            .map_or("id", |a| a.name.as_str())
    }
}

/// One relationship between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name of the source entity.
    pub source_entity: String,
    /// Name of the target entity.
    pub target_entity: String,
    /// Kind tag.
    pub relationship_type: RelationshipKind,
    /// Cardinality annotation on the source side, free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cardinality: Option<String>,
    /// Cardinality annotation on the target side, free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cardinality: Option<String>,
}

/// The schema IR: entities and relationships in declaration order plus
/// free-form metadata.
///
/// Entity order is semantically meaningful and preserved end to end; it is
/// the only signal for "primary" versus "dependent" entities downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Optional project name; serialized as `null` when absent.
    #[serde(default)]
    pub project_name: Option<String>,
    /// Entities in declaration order.
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Relationships in declaration order.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Free-form metadata, including the intake processing timestamp.
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
}

impl Schema {
    /// Look up an entity by exact name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// SHA-256 hex digest of the canonical wire JSON, metadata excluded.
    ///
    /// Stable across invocations for the same logical schema, so repeated
    /// analyses of one diagram can be recognized; the intake timestamp lives
    /// in metadata and is deliberately left out.
    pub fn fingerprint(&self) -> String {
        let mut stripped = self.clone();
        stripped.metadata = serde_json::Map::new();
        let canonical = serde_json::to_string(&stripped).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parse() {
        assert_eq!(DataType::parse("string"), Some(DataType::String));
        assert_eq!(DataType::parse("VARCHAR"), Some(DataType::VarChar));
        assert_eq!(DataType::parse(" DateTime "), Some(DataType::DateTime));
        assert_eq!(DataType::parse("bigint"), Some(DataType::BigInt));
        assert_eq!(DataType::parse("nvarchar"), None);
        assert_eq!(DataType::parse(""), None);
    }

    #[test]
    fn test_data_type_tags_round_trip_serde() {
        for data_type in DataType::ALL {
            let json = serde_json::to_string(&data_type).unwrap();
            assert_eq!(json, format!("\"{}\"", data_type.tag()));
            let back: DataType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, data_type);
        }
    }

    #[test]
    fn test_relationship_kind_parse_canonical() {
        assert_eq!(
            RelationshipKind::parse("1:N"),
            Some(RelationshipKind::OneToMany)
        );
        assert_eq!(
            RelationshipKind::parse("1:n (identifying)"),
            Some(RelationshipKind::OneToManyIdentifying)
        );
        assert_eq!(
            RelationshipKind::parse("M:N (Non-Identifying)"),
            Some(RelationshipKind::ManyToManyNonIdentifying)
        );
    }

    #[test]
    fn test_relationship_kind_parse_alternates() {
        assert_eq!(
            RelationshipKind::parse("N:N"),
            Some(RelationshipKind::ManyToMany)
        );
        assert_eq!(
            RelationshipKind::parse("M:M"),
            Some(RelationshipKind::ManyToMany)
        );
        assert_eq!(
            RelationshipKind::parse("1:M"),
            Some(RelationshipKind::OneToMany)
        );
        assert_eq!(
            RelationshipKind::parse("M:1"),
            Some(RelationshipKind::ManyToOne)
        );
        assert_eq!(
            RelationshipKind::parse("one-to-many"),
            Some(RelationshipKind::OneToMany)
        );
        assert_eq!(
            RelationshipKind::parse("One To One"),
            Some(RelationshipKind::OneToOne)
        );
        assert_eq!(RelationshipKind::parse("friendship"), None);
    }

    #[test]
    fn test_storage_name_override_wins() {
        let entity = Entity {
            name: "OrderItem".to_string(),
            table_name: Some("order_lines".to_string()),
            ..Entity::default()
        };
        assert_eq!(entity.storage_name(), "order_lines");

        let derived = Entity {
            name: "OrderItem".to_string(),
            ..Entity::default()
        };
        assert_eq!(derived.storage_name(), "order_item");
    }

    #[test]
    fn test_identity_column() {
        let mut entity = Entity {
            name: "Customer".to_string(),
            attributes: vec![Attribute {
                name: "customer_id".to_string(),
                is_primary_key: true,
                ..Attribute::default()
            }],
            ..Entity::default()
        };
        assert_eq!(entity.identity_column(), "customer_id");
        entity.attributes[0].is_primary_key = false;
        assert_eq!(entity.identity_column(), "id");
    }

    #[test]
    fn test_fingerprint_ignores_metadata() {
        let mut schema = Schema {
            entities: vec![Entity {
                name: "User".to_string(),
                ..Entity::default()
            }],
            ..Schema::default()
        };
        let before = schema.fingerprint();
        schema.metadata.insert(
            "analysisTimestamp".to_string(),
            Value::String("2026-01-01T00:00:00Z".to_string()),
        );
        assert_eq!(schema.fingerprint(), before);
    }

    #[test]
    fn test_wire_field_names() {
        let schema = Schema {
            project_name: Some("Shop".to_string()),
            entities: vec![Entity {
                name: "User".to_string(),
                attributes: vec![Attribute {
                    name: "email".to_string(),
                    is_nullable: false,
                    is_unique: true,
                    max_length: Some(255),
                    ..Attribute::default()
                }],
                ..Entity::default()
            }],
            relationships: vec![Relationship {
                name: None,
                source_entity: "User".to_string(),
                target_entity: "Order".to_string(),
                relationship_type: RelationshipKind::OneToMany,
                source_cardinality: None,
                target_cardinality: None,
            }],
            metadata: serde_json::Map::new(),
        };
        let wire = serde_json::to_value(&schema).unwrap();
        assert_eq!(wire["projectName"], "Shop");
        let attribute = &wire["entities"][0]["attributes"][0];
        assert_eq!(attribute["dataType"], "string");
        assert_eq!(attribute["isPrimaryKey"], false);
        assert_eq!(attribute["isNullable"], false);
        assert_eq!(attribute["maxLength"], 255);
        assert!(attribute.get("referencesTable").is_none());
        assert_eq!(wire["relationships"][0]["sourceEntity"], "User");
        assert_eq!(wire["relationships"][0]["relationshipType"], "1:N");
    }
}
