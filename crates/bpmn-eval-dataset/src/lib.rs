//! Fine-tuning dataset preparation for BPMN generation.
//!
//! This crate provides:
//! - Prompt redaction returning `(redacted_text, detected_kinds)`
//! - Conversion of raw generation records into training pairs
//! - JSONL reading/writing and an end-to-end [`extract`] run
//!
//! Raw records come from a JSONL export of the generation store; querying
//! the store itself is outside this crate.
#![deny(missing_docs)]

/// Error types for dataset operations.
pub mod errors;
/// Extraction pipeline.
pub mod extract;
/// JSONL helpers.
pub mod jsonl;
/// PII redaction.
pub mod pii;
/// Raw record to training pair conversion.
pub mod record;

pub use errors::DatasetError;
pub use extract::{build_training_set, extract, ExtractOptions};
pub use jsonl::{read_field, read_jsonl, write_jsonl};
pub use pii::{redact_pii, PiiKind};
pub use record::{process_record, DiagramType, RecordMetadata, TrainingRecord};
