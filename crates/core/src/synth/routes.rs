//! Routing units: one router per entity plus the `/api` aggregator.
//!
//! `GET /search` is bound before `GET /:id` so the literal segment is not
//! swallowed by the parameter route. Create and update pass through the
//! required-field middleware when the entity has required attributes.

use crate::names;
use crate::schema::{Entity, Schema};

pub fn render(entity: &Entity) -> String {
    let pascal = names::pascal_case(&entity.name);
    let plural = names::pluralize(&pascal);
    let with_search = !super::textual_attributes(entity).is_empty();
    let required = super::required_fields(entity);

    let mut lines: Vec<String> = vec!["import { Router } from 'express';".to_string()];
    if !required.is_empty() {
        lines.push("import { requireFields } from '../middleware/validateRequest';".to_string());
    }
    lines.push("import {".to_string());
    lines.push(format!("  create{pascal},"));
    lines.push(format!("  get{plural},"));
    lines.push(format!("  get{pascal}ById,"));
    lines.push(format!("  update{pascal},"));
    lines.push(format!("  delete{pascal},"));
    if with_search {
        lines.push(format!("  search{plural},"));
    }
    lines.push(format!("}} from '../controllers/{pascal}Controller';"));
    lines.push(String::new());
    lines.push("const router = Router();".to_string());
    lines.push(String::new());

    lines.push(format!("router.get('/', get{plural});"));
    if with_search {
        lines.push(format!("router.get('/search', search{plural});"));
    }
    lines.push(format!("router.get('/:id', get{pascal}ById);"));
    let guard = if required.is_empty() {
        String::new()
    } else {
        let quoted: Vec<String> = required
            .iter()
            .map(|name| format!("'{}'", names::escape_ts_string(name)))
            .collect();
        format!("requireFields([{}]), ", quoted.join(", "))
    };
    lines.push(format!("router.post('/', {guard}create{pascal});"));
    lines.push(format!("router.put('/:id', {guard}update{pascal});"));
    lines.push(format!("router.delete('/:id', delete{pascal});"));
    lines.push(String::new());
    lines.push("export default router;".to_string());

    lines.join("\n") + "\n"
}

/// The `src/routes/index.ts` aggregator mounting every entity router on its
/// resource path.
pub fn aggregator(schema: &Schema) -> String {
    let mut imports: Vec<String> = vec!["import { Router } from 'express';".to_string()];
    let mut mounts: Vec<String> = Vec::new();
    for entity in &schema.entities {
        let pascal = names::pascal_case(&entity.name);
        let binding = format!("{}Routes", names::camel_case(&entity.name));
        imports.push(format!("import {binding} from './{pascal}Routes';"));
        mounts.push(format!(
            "router.use('/{}', {binding});",
            names::escape_ts_string(&entity.storage_name())
        ));
    }

    let mut lines = imports;
    lines.push(String::new());
    lines.push("const router = Router();".to_string());
    lines.push(String::new());
    lines.extend(mounts);
    lines.push(String::new());
    lines.push("export default router;".to_string());
    lines.join("\n") + "\n"
}
