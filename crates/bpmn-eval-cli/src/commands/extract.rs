//! Extract command implementation.

use std::path::PathBuf;

use bpmn_eval_dataset::{extract, DiagramType, ExtractOptions};

pub fn run(
    input: PathBuf,
    output: PathBuf,
    limit: Option<usize>,
    diagram_type: DiagramType,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions {
        diagram_type,
        limit,
    };
    let count = extract(&input, &output, options)
        .map_err(|e| format!("Extraction failed: {}", e))?;

    println!("Extracted {} records to {}", count, output.display());
    Ok(())
}
