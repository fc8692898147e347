//! Core pipeline turning image-model ER output into a generated
//! Express + Sequelize backend.
//!
//! Stages, each its own module: [`intake`] recovers a JSON document from
//! free-form response text with a bounded repair pass, [`normalize`] shapes
//! it into the [`schema::Schema`] IR, [`reconcile`] repairs foreign-key
//! references in place, [`validate`] reports findings as data and [`synth`]
//! deterministically emits the project files. [`pipeline::analyze`] and
//! [`pipeline::compile`] compose the stages end to end.

pub mod error;
pub mod intake;
pub mod names;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod schema;
pub mod synth;
pub mod validate;

pub use error::{CompileError, IntakeError, NormalizeError, SynthesisError};
pub use pipeline::{Compilation, SchemaReport, Statistics, analyze, compile};
pub use reconcile::{Correction, MatchRule, reconcile};
pub use schema::{Attribute, DataType, Entity, Relationship, RelationshipKind, Schema};
pub use synth::{SynthesisOutput, synthesize};
pub use validate::{ValidationResult, validate};
