//! Data-model unit: one Sequelize model module per entity.
//!
//! Fields follow attribute declaration order. Implicit fields come last: an
//! auto-increment `id` only when the entity declares no primary key and no
//! attribute of that name, then the two audit timestamps unless the entity
//! declares fields with those names itself.

use serde_json::Value;

use crate::names;
use crate::schema::{Attribute, Entity};

use super::types;

pub fn render(entity: &Entity) -> String {
    let pascal = names::pascal_case(&entity.name);
    let implicit_id = !entity.has_primary_key() && entity.attribute("id").is_none();
    let with_created = entity.attribute("createdAt").is_none();
    let with_updated = entity.attribute("updatedAt").is_none();

    let mut interface_lines: Vec<String> = Vec::new();
    let mut field_blocks: Vec<String> = Vec::new();

    if implicit_id {
        interface_lines.push("  id: number;".to_string());
        field_blocks.push(
            [
                "  id: {",
                "    type: DataTypes.INTEGER,",
                "    autoIncrement: true,",
                "    primaryKey: true,",
                "  },",
            ]
            .join("\n"),
        );
    }
    for attribute in &entity.attributes {
        interface_lines.push(interface_line(attribute));
        field_blocks.push(field_block(attribute));
    }
    if with_created {
        interface_lines.push("  createdAt?: Date;".to_string());
        field_blocks.push("  createdAt: {\n    type: DataTypes.DATE,\n  },".to_string());
    }
    if with_updated {
        interface_lines.push("  updatedAt?: Date;".to_string());
        field_blocks.push("  updatedAt: {\n    type: DataTypes.DATE,\n  },".to_string());
    }

    format!(
        "import {{ DataTypes }} from 'sequelize';\n\
         import {{ sequelize }} from '../db';\n\
         \n\
         export interface {pascal}Attributes {{\n\
         {interface}\n\
         }}\n\
         \n\
         export const {pascal} = sequelize.define('{pascal}', {{\n\
         {fields}\n\
         }}, {{\n\
         \x20 tableName: '{table}',\n\
         \x20 timestamps: true,\n\
         }});\n",
        interface = interface_lines.join("\n"),
        fields = field_blocks.join("\n"),
        table = names::escape_ts_string(&entity.storage_name()),
    )
}

fn interface_line(attribute: &Attribute) -> String {
    let mapped = types::map_type(attribute.data_type);
    let marker = if attribute.is_nullable { "?" } else { "" };
    format!(
        "  {}{}: {};",
        names::quote_key(&attribute.name),
        marker,
        mapped.typescript
    )
}

fn field_block(attribute: &Attribute) -> String {
    let mut lines = vec![
        format!("  {}: {{", names::quote_key(&attribute.name)),
        format!(
            "    type: {},",
            types::sequelize_type(attribute.data_type, attribute.max_length)
        ),
    ];
    if !attribute.is_nullable {
        lines.push("    allowNull: false,".to_string());
    }
    if attribute.is_unique {
        lines.push("    unique: true,".to_string());
    }
    if attribute.is_primary_key {
        lines.push("    primaryKey: true,".to_string());
    }
    if let Some(default) = &attribute.default_value {
        lines.push(format!("    defaultValue: {},", ts_value(default)));
    }
    lines.push("  },".to_string());
    lines.join("\n")
}

fn ts_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", names::escape_ts_string(s)),
        other => other.to_string(),
    }
}
