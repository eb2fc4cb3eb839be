//! Metrics command implementation.

use std::path::PathBuf;

use bpmn_eval_dataset::read_field;
use bpmn_eval_metrics::compute_all;

use super::open_schema;
use crate::output::print_metrics;

pub fn run(
    predictions: PathBuf,
    ground_truths: PathBuf,
    xsd: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = open_schema(xsd.as_deref())?;

    let mut predicted = read_field(&predictions, "output")
        .map_err(|e| format!("Failed to read predictions {}: {}", predictions.display(), e))?;
    let mut truths = read_field(&ground_truths, "output")
        .map_err(|e| format!("Failed to read ground truths {}: {}", ground_truths.display(), e))?;

    if predicted.len() != truths.len() {
        eprintln!(
            "Warning: Mismatch in lengths: {} predictions vs {} ground truths",
            predicted.len(),
            truths.len()
        );
        let shortest = predicted.len().min(truths.len());
        predicted.truncate(shortest);
        truths.truncate(shortest);
    }

    let report = compute_all(&predicted, &truths, schema.as_deref())?;
    print_metrics(&report);

    if let Some(path) = output {
        report.write_json(&path)?;
        println!("\nMetrics saved to {}", path.display());
    }

    Ok(())
}
