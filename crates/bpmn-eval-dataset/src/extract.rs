//! End-to-end extraction: raw export -> redacted training pairs.

use std::path::Path;

use serde_json::Value;

use crate::errors::DatasetError;
use crate::jsonl::{read_jsonl, write_jsonl};
use crate::record::{is_completed, process_record, DiagramType, TrainingRecord};

/// Options for one extraction run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Diagram flavour, which selects the system prompt.
    pub diagram_type: DiagramType,
    /// Maximum number of raw records to consider.
    pub limit: Option<usize>,
}

/// Converts completed raw records into training pairs.
pub fn build_training_set(raw: &[Value], options: ExtractOptions) -> Vec<TrainingRecord> {
    raw.iter()
        .filter(|record| is_completed(record))
        .take(options.limit.unwrap_or(usize::MAX))
        .filter_map(|record| process_record(record, options.diagram_type))
        .collect()
}

/// Reads a raw JSONL export, writes the training pairs and returns how
/// many were written.
pub fn extract(input: &Path, output: &Path, options: ExtractOptions) -> Result<usize, DatasetError> {
    let raw: Vec<Value> = read_jsonl(input)?;
    tracing::info!(records = raw.len(), input = %input.display(), "loaded raw records");

    let records = build_training_set(&raw, options);
    let skipped = raw.len() - records.len();
    if skipped > 0 {
        tracing::debug!(skipped, "skipped incomplete or empty records");
    }

    write_jsonl(output, &records)?;
    tracing::info!(records = records.len(), output = %output.display(), "wrote training pairs");
    Ok(records.len())
}
