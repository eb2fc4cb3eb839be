use thiserror::Error;

/// Errors raised while computing batch metrics.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Prediction and reference batches differ in length.
    #[error("predictions and ground truths must have the same length ({predictions} vs {ground_truths})")]
    LengthMismatch {
        /// Number of predictions.
        predictions: usize,
        /// Number of ground truths.
        ground_truths: usize,
    },
    /// I/O error while writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
