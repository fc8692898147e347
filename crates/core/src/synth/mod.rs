//! Deterministic synthesis of an Express + Sequelize TypeScript backend.
//!
//! Synthesis is a pure function of the schema: no clock, no randomness, no
//! filesystem. The same IR always produces byte-identical output, keyed by
//! relative path in emission order. Callers are expected to hand in a
//! schema that already passed validation; the only failure left is an
//! internal one, two units collapsing onto the same output path.

mod controller;
mod model;
mod project;
mod routes;
mod service;
pub mod types;

use indexmap::IndexMap;
use tracing::info;

use crate::error::SynthesisError;
use crate::names;
use crate::schema::{Attribute, Entity, Schema};

pub use types::{TypeMapping, map_type, sequelize_type};

/// Generated project as relative path to file content, in emission order.
#[derive(Debug, Clone, Default)]
pub struct SynthesisOutput {
    files: IndexMap<String, String>,
}

impl SynthesisOutput {
    fn insert(
        &mut self,
        path: impl Into<String>,
        content: String,
    ) -> Result<(), SynthesisError> {
        let path = path.into();
        if self.files.contains_key(&path) {
            return Err(SynthesisError::PathCollision { path });
        }
        self.files.insert(path, content);
        Ok(())
    }

    /// Content of one unit by relative path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// All units in emission order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Synthesize the whole project for a validated schema.
pub fn synthesize(schema: &Schema) -> Result<SynthesisOutput, SynthesisError> {
    let mut output = SynthesisOutput::default();

    output.insert("package.json", project::package_json(schema))?;
    output.insert("tsconfig.json", project::tsconfig())?;
    output.insert(".env.example", project::env_example())?;
    output.insert("src/index.ts", project::index_ts())?;
    output.insert("src/app.ts", project::app_ts())?;
    output.insert("src/db.ts", project::db_ts())?;
    output.insert("src/middleware/errorHandler.ts", project::error_handler())?;
    output.insert(
        "src/middleware/validateRequest.ts",
        project::validate_request(),
    )?;

    for entity in &schema.entities {
        let pascal = names::pascal_case(&entity.name);
        output.insert(format!("src/models/{pascal}.ts"), model::render(entity))?;
        output.insert(
            format!("src/services/{pascal}Service.ts"),
            service::render(entity),
        )?;
        output.insert(
            format!("src/controllers/{pascal}Controller.ts"),
            controller::render(entity),
        )?;
        output.insert(format!("src/routes/{pascal}Routes.ts"), routes::render(entity))?;
    }

    output.insert("src/models/index.ts", project::models_index(schema))?;
    output.insert("src/routes/index.ts", routes::aggregator(schema))?;
    output.insert("README.md", project::readme(schema))?;

    info!(
        files = output.len(),
        entities = schema.entities.len(),
        "Synthesized project"
    );
    Ok(output)
}

/// Attributes whose mapped type participates in substring search.
fn textual_attributes(entity: &Entity) -> Vec<&Attribute> {
    entity
        .attributes
        .iter()
        .filter(|a| types::map_type(a.data_type).textual)
        .collect()
}

/// Names a create/update request must carry: non-nullable attributes that
/// are neither primary keys nor defaulted.
fn required_fields(entity: &Entity) -> Vec<&str> {
    entity
        .attributes
        .iter()
        .filter(|a| !a.is_nullable && !a.is_primary_key && a.default_value.is_none())
        .map(|a| a.name.as_str())
        .collect()
}
