//! End-to-end pipeline: intake, normalization, reconciliation, validation
//! and, for [`compile`], synthesis.
//!
//! [`analyze`] runs everything except synthesis and always yields a report
//! when the text contains a shapeable document, whether or not the schema
//! is valid. [`compile`] is the strict form: validation errors abort with
//! the full report attached so callers can still show diagnostics.

use serde::Serialize;
use tracing::info;

use crate::error::CompileError;
use crate::reconcile::{self, Correction};
use crate::schema::Schema;
use crate::synth::{self, SynthesisOutput};
use crate::validate::{self, ValidationResult};
use crate::{intake, normalize};

/// Aggregate counts over one schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub entities: usize,
    pub relationships: usize,
    pub attributes: usize,
    pub entities_with_primary_key: usize,
    pub foreign_keys: usize,
}

impl Statistics {
    pub fn of(schema: &Schema) -> Self {
        Self {
            entities: schema.entities.len(),
            relationships: schema.relationships.len(),
            attributes: schema.entities.iter().map(|e| e.attributes.len()).sum(),
            entities_with_primary_key: schema
                .entities
                .iter()
                .filter(|e| e.has_primary_key())
                .count(),
            foreign_keys: schema
                .entities
                .iter()
                .flat_map(|e| &e.attributes)
                .filter(|a| a.is_foreign_key)
                .count(),
        }
    }
}

/// Everything the pipeline learned about one upstream response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaReport {
    /// The reconciled schema.
    pub schema: Schema,
    /// Foreign-key repairs applied during reconciliation.
    pub corrections: Vec<Correction>,
    /// Findings of both validation phases.
    pub validation: ValidationResult,
    /// Aggregate counts over the reconciled schema.
    pub statistics: Statistics,
    /// Content fingerprint of the reconciled schema, metadata excluded.
    pub fingerprint: String,
}

/// A report together with the synthesized project.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub report: SchemaReport,
    pub output: SynthesisOutput,
}

/// Run the pipeline through validation.
pub fn analyze(response_text: &str) -> Result<SchemaReport, CompileError> {
    let doc = intake::parse_response(response_text)?;
    let mut schema = normalize::normalize(doc)?;
    let corrections = reconcile::reconcile(&mut schema);
    let validation = validate::validate(&schema);
    let statistics = Statistics::of(&schema);
    let fingerprint = schema.fingerprint();
    info!(
        entities = statistics.entities,
        relationships = statistics.relationships,
        corrections = corrections.len(),
        errors = validation.errors.len(),
        warnings = validation.warnings.len(),
        "Analyzed schema"
    );
    Ok(SchemaReport {
        schema,
        corrections,
        validation,
        statistics,
        fingerprint,
    })
}

/// Run the full pipeline and synthesize the backend project.
pub fn compile(response_text: &str) -> Result<Compilation, CompileError> {
    let report = analyze(response_text)?;
    if !report.validation.valid {
        return Err(CompileError::Invalid {
            report: Box::new(report),
        });
    }
    let output = synth::synthesize(&report.schema)?;
    Ok(Compilation { report, output })
}
