//! Request-handler unit: express handlers wiring HTTP to the service.
//!
//! Handlers never answer errors themselves beyond the 404 case; everything
//! else is forwarded to the centralized error middleware via `next`.

use crate::names;
use crate::schema::Entity;

pub fn render(entity: &Entity) -> String {
    let pascal = names::pascal_case(&entity.name);
    let plural = names::pluralize(&pascal);
    let with_search = !super::textual_attributes(entity).is_empty();

    let mut lines: Vec<String> = vec![
        "import { Request, Response, NextFunction } from 'express';".to_string(),
        format!("import {{ {pascal}Service }} from '../services/{pascal}Service';"),
        String::new(),
        format!("const service = new {pascal}Service();"),
        String::new(),
    ];

    lines.push(format!(
        "export async function create{pascal}(req: Request, res: Response, next: NextFunction) {{"
    ));
    lines.push("  try {".to_string());
    lines.push("    const item = await service.create(req.body);".to_string());
    lines.push("    res.status(201).json(item);".to_string());
    lines.push("  } catch (err) {".to_string());
    lines.push("    next(err);".to_string());
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!(
        "export async function get{plural}(req: Request, res: Response, next: NextFunction) {{"
    ));
    lines.push("  try {".to_string());
    lines.push("    const page = Number(req.query.page) || 1;".to_string());
    lines.push("    const limit = Number(req.query.limit) || 20;".to_string());
    lines.push("    const result = await service.findAll(page, limit);".to_string());
    lines.push("    res.json(result);".to_string());
    lines.push("  } catch (err) {".to_string());
    lines.push("    next(err);".to_string());
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!(
        "export async function get{pascal}ById(req: Request, res: Response, next: NextFunction) {{"
    ));
    lines.push("  try {".to_string());
    lines.push("    const item = await service.findById(req.params.id);".to_string());
    lines.push("    if (!item) {".to_string());
    lines.push(format!(
        "      res.status(404).json({{ error: '{pascal} not found' }});"
    ));
    lines.push("      return;".to_string());
    lines.push("    }".to_string());
    lines.push("    res.json(item);".to_string());
    lines.push("  } catch (err) {".to_string());
    lines.push("    next(err);".to_string());
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!(
        "export async function update{pascal}(req: Request, res: Response, next: NextFunction) {{"
    ));
    lines.push("  try {".to_string());
    lines.push("    const item = await service.update(req.params.id, req.body);".to_string());
    lines.push("    if (!item) {".to_string());
    lines.push(format!(
        "      res.status(404).json({{ error: '{pascal} not found' }});"
    ));
    lines.push("      return;".to_string());
    lines.push("    }".to_string());
    lines.push("    res.json(item);".to_string());
    lines.push("  } catch (err) {".to_string());
    lines.push("    next(err);".to_string());
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!(
        "export async function delete{pascal}(req: Request, res: Response, next: NextFunction) {{"
    ));
    lines.push("  try {".to_string());
    lines.push("    const removed = await service.remove(req.params.id);".to_string());
    lines.push("    if (!removed) {".to_string());
    lines.push(format!(
        "      res.status(404).json({{ error: '{pascal} not found' }});"
    ));
    lines.push("      return;".to_string());
    lines.push("    }".to_string());
    lines.push("    res.status(204).send();".to_string());
    lines.push("  } catch (err) {".to_string());
    lines.push("    next(err);".to_string());
    lines.push("  }".to_string());
    lines.push("}".to_string());

    if with_search {
        lines.push(String::new());
        lines.push(format!(
            "export async function search{plural}(req: Request, res: Response, next: NextFunction) {{"
        ));
        lines.push("  try {".to_string());
        lines.push("    const term = String(req.query.q || '');".to_string());
        lines.push("    const items = await service.search(term);".to_string());
        lines.push("    res.json(items);".to_string());
        lines.push("  } catch (err) {".to_string());
        lines.push("    next(err);".to_string());
        lines.push("  }".to_string());
        lines.push("}".to_string());
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, DataType};

    fn entity_with(name: &str, attributes: Vec<Attribute>) -> Entity {
        Entity {
            name: name.to_string(),
            attributes,
            table_name: None,
        }
    }

    fn attribute(name: &str, data_type: DataType) -> Attribute {
        Attribute {
            name: name.to_string(),
            data_type,
            ..Attribute::default()
        }
    }

    #[test]
    fn test_handler_names_pluralize() {
        let entity = entity_with("Category", vec![attribute("label", DataType::String)]);
        let rendered = render(&entity);
        assert!(rendered.contains("export async function createCategory("));
        assert!(rendered.contains("export async function getCategories("));
        assert!(rendered.contains("export async function getCategoryById("));
        assert!(rendered.contains("export async function updateCategory("));
        assert!(rendered.contains("export async function deleteCategory("));
        assert!(rendered.contains("export async function searchCategories("));
    }

    #[test]
    fn test_not_found_paths() {
        let entity = entity_with("User", vec![attribute("email", DataType::String)]);
        let rendered = render(&entity);
        assert_eq!(
            rendered
                .matches("res.status(404).json({ error: 'User not found' });")
                .count(),
            3
        );
        assert!(rendered.contains("res.status(204).send();"));
    }

    #[test]
    fn test_no_search_handler_without_textual_attributes() {
        let entity = entity_with("Reading", vec![attribute("value", DataType::Float)]);
        let rendered = render(&entity);
        assert!(!rendered.contains("search"));
    }

    #[test]
    fn test_errors_are_forwarded() {
        let entity = entity_with("User", vec![attribute("email", DataType::String)]);
        let rendered = render(&entity);
        assert_eq!(rendered.matches("next(err);").count(), 6);
    }
}
