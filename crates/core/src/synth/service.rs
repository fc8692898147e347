//! Data-access unit: one service class per entity wrapping the model.
//!
//! `findAll` pages with `page`/`limit` and orders by the identity column so
//! pagination is stable. `search` substring-matches over the textual
//! attributes and is left out entirely when the entity has none.

use crate::names;
use crate::schema::Entity;

pub fn render(entity: &Entity) -> String {
    let pascal = names::pascal_case(&entity.name);
    let textual = super::textual_attributes(entity);

    let mut lines: Vec<String> = Vec::new();
    if !textual.is_empty() {
        lines.push("import { Op } from 'sequelize';".to_string());
    }
    lines.push(format!("import {{ {pascal} }} from '../models/{pascal}';"));
    lines.push(String::new());
    lines.push(format!("export class {pascal}Service {{"));

    lines.push("  async create(data: object) {".to_string());
    lines.push(format!("    return {pascal}.create(data);"));
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push("  async findAll(page = 1, limit = 20) {".to_string());
    lines.push("    const offset = (page - 1) * limit;".to_string());
    lines.push(format!("    return {pascal}.findAndCountAll({{"));
    lines.push(format!(
        "      order: [['{}', 'ASC']],",
        names::escape_ts_string(entity.identity_column())
    ));
    lines.push("      offset,".to_string());
    lines.push("      limit,".to_string());
    lines.push("    });".to_string());
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push("  async findById(id: string) {".to_string());
    lines.push(format!("    return {pascal}.findByPk(id);"));
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push("  async update(id: string, data: object) {".to_string());
    lines.push(format!("    const item = await {pascal}.findByPk(id);"));
    lines.push("    if (!item) {".to_string());
    lines.push("      return null;".to_string());
    lines.push("    }".to_string());
    lines.push("    return item.update(data);".to_string());
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push("  async remove(id: string) {".to_string());
    lines.push(format!("    const item = await {pascal}.findByPk(id);"));
    lines.push("    if (!item) {".to_string());
    lines.push("      return false;".to_string());
    lines.push("    }".to_string());
    lines.push("    await item.destroy();".to_string());
    lines.push("    return true;".to_string());
    lines.push("  }".to_string());

    if !textual.is_empty() {
        lines.push(String::new());
        lines.push("  async search(term: string) {".to_string());
        lines.push(format!("    return {pascal}.findAll({{"));
        lines.push("      where: {".to_string());
        lines.push("        [Op.or]: [".to_string());
        for attribute in &textual {
            lines.push(format!(
                "          {{ {}: {{ [Op.iLike]: `%${{term}}%` }} }},",
                names::quote_key(&attribute.name)
            ));
        }
        lines.push("        ],".to_string());
        lines.push("      },".to_string());
        lines.push("    });".to_string());
        lines.push("  }".to_string());
    }

    lines.push("}".to_string());
    lines.join("\n") + "\n"
}
