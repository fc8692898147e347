//! Data-type mapping table for the emitted Sequelize/TypeScript code.

use crate::schema::DataType;

/// How one IR data type renders in the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// Sequelize column type expression.
    pub sequelize: &'static str,
    /// TypeScript attribute type.
    pub typescript: &'static str,
    /// Whether the column participates in substring search.
    pub textual: bool,
}

const fn mapping(sequelize: &'static str, typescript: &'static str, textual: bool) -> TypeMapping {
    TypeMapping {
        sequelize,
        typescript,
        textual,
    }
}

/// Total mapping over the closed data-type enumeration.
pub fn map_type(data_type: DataType) -> TypeMapping {
    match data_type {
        DataType::String => mapping("DataTypes.STRING", "string", true),
        DataType::Integer => mapping("DataTypes.INTEGER", "number", false),
        DataType::Float => mapping("DataTypes.FLOAT", "number", false),
        DataType::Boolean => mapping("DataTypes.BOOLEAN", "boolean", false),
        DataType::Date => mapping("DataTypes.DATEONLY", "Date", false),
        DataType::DateTime => mapping("DataTypes.DATE", "Date", false),
        DataType::Text => mapping("DataTypes.TEXT", "string", true),
        DataType::Json => mapping("DataTypes.JSONB", "object", false),
        DataType::Uuid => mapping("DataTypes.UUID", "string", false),
        DataType::Decimal => mapping("DataTypes.DECIMAL", "number", false),
        // Enumerations arrive without their member lists, so the column
        // falls back to plain text.
        DataType::Enum => mapping("DataTypes.STRING", "string", false),
        DataType::Array => mapping("DataTypes.JSONB", "object", false),
        DataType::Time => mapping("DataTypes.TIME", "string", false),
        DataType::Blob => mapping("DataTypes.BLOB", "Buffer", false),
        DataType::Binary => mapping("DataTypes.BLOB", "Buffer", false),
        DataType::Char => mapping("DataTypes.CHAR", "string", true),
        DataType::VarChar => mapping("DataTypes.STRING", "string", true),
        DataType::LongText => mapping("DataTypes.TEXT", "string", true),
        DataType::TinyInt => mapping("DataTypes.SMALLINT", "number", false),
        DataType::SmallInt => mapping("DataTypes.SMALLINT", "number", false),
        DataType::BigInt => mapping("DataTypes.BIGINT", "number", false),
        DataType::Double => mapping("DataTypes.DOUBLE", "number", false),
        DataType::Real => mapping("DataTypes.REAL", "number", false),
        DataType::Timestamp => mapping("DataTypes.DATE", "Date", false),
        DataType::Year => mapping("DataTypes.INTEGER", "number", false),
        DataType::Set => mapping("DataTypes.JSONB", "object", false),
    }
}

/// Sequelize column type with the length applied for the types that take
/// one.
pub fn sequelize_type(data_type: DataType, max_length: Option<i64>) -> String {
    match (data_type, max_length) {
        (DataType::String | DataType::VarChar, Some(n)) if n > 0 => {
            format!("DataTypes.STRING({n})")
        }
        (DataType::Char, Some(n)) if n > 0 => format!("DataTypes.CHAR({n})"),
        _ => map_type(data_type).sequelize.to_string(),
    }
}
