//! Error types for the schema compilation pipeline.
//!
//! Validation findings are deliberately *not* errors: a schema that fails
//! validation is an expected outcome, reported through
//! [`ValidationResult`](crate::validate::ValidationResult). The enums here
//! cover the terminal conditions only.

use thiserror::Error;

use crate::pipeline::SchemaReport;

/// Upstream response text could not be turned into a document tree.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The response contains no `{...}` span to parse.
    #[error("response text contains no JSON object payload")]
    NoJsonPayload,
    /// The extracted span failed to parse even after the repair pass.
    ///
    /// Carries the syntax error from the unrepaired candidate, which names
    /// the actual upstream defect rather than whatever the repair transforms
    /// turned it into.
    #[error("JSON payload is malformed beyond repair: {source}")]
    Unparseable {
        /// Parse failure of the original (unrepaired) candidate span.
        #[source]
        source: serde_json::Error,
    },
}

/// The raw document is missing the shape normalization requires.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The document root has no `entities` array at all.
    #[error("document has no `entities` array")]
    MissingEntities,
}

/// Internal invariant violation during code synthesis.
///
/// These indicate a defect in the compiler or an input the validator should
/// have rejected, never a user-facing condition; synthesis aborts with no
/// partial output.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Two generated files collapsed onto the same output path.
    #[error("two generated files collapse onto the path `{path}`")]
    PathCollision {
        /// The contested relative path.
        path: String,
    },
}

/// Terminal outcome of a full pipeline run.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Intake could not recover a document from the response text.
    #[error(transparent)]
    Intake(#[from] IntakeError),
    /// The document lacked the required schema shape.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    /// Validation produced blocking errors; synthesis was not attempted.
    ///
    /// The full report is carried so callers can render the diagnostics.
    #[error("schema failed validation with {} blocking error(s)", report.validation.errors.len())]
    Invalid {
        /// Analysis result including the failing diagnostics.
        report: Box<SchemaReport>,
    },
    /// Synthesis hit an internal invariant violation.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}
