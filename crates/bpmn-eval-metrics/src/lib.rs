//! Quality metrics for generated BPMN documents.
//!
//! This crate provides:
//! - Element signatures and element-level precision/recall/F1
//! - Normalized tree edit distance over element tag names
//! - Exact match on canonical forms and schema-validity rate
//! - A batch [`MetricsReport`] combining all of the above
//!
//! Unparsable documents never fail a metric: they score as empty element
//! sets or single-node trees.
#![deny(missing_docs)]

/// Batch aggregation and the metrics report.
pub mod batch;
/// Error types for batch metrics.
pub mod errors;
/// Element signatures and set-based scores.
pub mod signature;
/// Zhang–Shasha tree edit distance.
pub mod tree_edit;

pub use batch::{
    compute_all, exact_match, exact_match_rate, schema_validation_rate, MetricsReport,
    RateSummary,
};
pub use errors::MetricsError;
pub use signature::{element_metrics, element_signatures, ElementMetrics, ElementSignature};
pub use tree_edit::{edit_distance, tree_edit_distance};
