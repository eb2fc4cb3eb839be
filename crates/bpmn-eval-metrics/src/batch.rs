//! Batch metrics over prediction/reference pairs.
//!
//! Every per-document call into the validator and canonicalizer is
//! stateless, so pairs are scored in parallel.

use std::fs;
use std::path::Path;

use bpmn_eval_xml::{canonicalize, validate_and_canonicalize, SchemaValidator};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::MetricsError;
use crate::signature::{element_metrics, ratio};
use crate::tree_edit::tree_edit_distance;

/// A rate together with the counts it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    /// `count / total`, or 0.0 for an empty batch.
    pub rate: f64,
    /// Number of hits.
    pub count: usize,
    /// Batch size.
    pub total: usize,
}

impl RateSummary {
    fn new(count: usize, total: usize) -> Self {
        Self {
            rate: ratio(count, total),
            count,
            total,
        }
    }
}

/// Aggregate quality metrics for a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Share of predictions passing validation.
    pub schema_validation_rate: f64,
    /// Number of valid predictions.
    pub schema_valid_count: usize,
    /// Number of predictions checked.
    pub schema_total_count: usize,
    /// `1 - schema_validation_rate`.
    pub schema_violation_rate: f64,
    /// Share of pairs whose canonical forms are byte-equal.
    pub exact_match_rate: f64,
    /// Number of exact matches.
    pub exact_match_count: usize,
    /// Mean element precision.
    pub element_precision: f64,
    /// Mean element recall.
    pub element_recall: f64,
    /// Mean element F1.
    pub element_f1: f64,
    /// Mean normalized tree edit distance.
    pub avg_tree_edit_distance: f64,
}

impl MetricsReport {
    /// Writes the report as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<(), MetricsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Whether two documents have byte-equal canonical forms.
pub fn exact_match(predicted: &str, ground_truth: &str) -> bool {
    canonicalize(predicted) == canonicalize(ground_truth)
}

/// Share of `outputs` that validate.
pub fn schema_validation_rate(
    outputs: &[String],
    schema: Option<&dyn SchemaValidator>,
) -> RateSummary {
    let valid = outputs
        .par_iter()
        .filter(|xml| validate_and_canonicalize(xml, schema).is_valid())
        .count();
    RateSummary::new(valid, outputs.len())
}

/// Share of pairs whose canonical forms match exactly.
pub fn exact_match_rate(
    predictions: &[String],
    ground_truths: &[String],
) -> Result<RateSummary, MetricsError> {
    check_lengths(predictions, ground_truths)?;
    let matches = predictions
        .par_iter()
        .zip(ground_truths.par_iter())
        .filter(|(predicted, truth)| exact_match(predicted, truth))
        .count();
    Ok(RateSummary::new(matches, predictions.len()))
}

struct PairScore {
    exact: bool,
    precision: f64,
    recall: f64,
    f1: f64,
    distance: f64,
}

/// Computes every batch metric.
pub fn compute_all(
    predictions: &[String],
    ground_truths: &[String],
    schema: Option<&dyn SchemaValidator>,
) -> Result<MetricsReport, MetricsError> {
    check_lengths(predictions, ground_truths)?;
    tracing::debug!(pairs = predictions.len(), "computing batch metrics");

    let validity = schema_validation_rate(predictions, schema);

    let scores: Vec<PairScore> = predictions
        .par_iter()
        .zip(ground_truths.par_iter())
        .map(|(predicted, truth)| {
            let elements = element_metrics(predicted, truth);
            PairScore {
                exact: exact_match(predicted, truth),
                precision: elements.precision,
                recall: elements.recall,
                f1: elements.f1,
                distance: tree_edit_distance(predicted, truth),
            }
        })
        .collect();

    let exact = RateSummary::new(scores.iter().filter(|s| s.exact).count(), scores.len());

    Ok(MetricsReport {
        schema_validation_rate: validity.rate,
        schema_valid_count: validity.count,
        schema_total_count: validity.total,
        schema_violation_rate: 1.0 - validity.rate,
        exact_match_rate: exact.rate,
        exact_match_count: exact.count,
        element_precision: mean(scores.iter().map(|s| s.precision)),
        element_recall: mean(scores.iter().map(|s| s.recall)),
        element_f1: mean(scores.iter().map(|s| s.f1)),
        avg_tree_edit_distance: mean(scores.iter().map(|s| s.distance)),
    })
}

fn check_lengths(predictions: &[String], ground_truths: &[String]) -> Result<(), MetricsError> {
    if predictions.len() != ground_truths.len() {
        return Err(MetricsError::LengthMismatch {
            predictions: predictions.len(),
            ground_truths: ground_truths.len(),
        });
    }
    Ok(())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_has_zero_rates() {
        let summary = schema_validation_rate(&[], None);
        assert_eq!(summary, RateSummary { rate: 0.0, count: 0, total: 0 });
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
        assert_eq!(mean([1.0, 2.0].into_iter()), 1.5);
    }

    #[test]
    fn exact_match_ignores_attribute_order() {
        assert!(exact_match(r#"<a x="1" y="2"/>"#, r#"<a y="2" x="1"/>"#));
        assert!(!exact_match(r#"<a x="1"/>"#, r#"<a x="2"/>"#));
    }
}
