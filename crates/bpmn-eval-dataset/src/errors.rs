use thiserror::Error;

/// Errors that can occur while reading or writing datasets.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A JSONL line is not valid JSON.
    #[error("invalid JSON at line {line}: {source}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// Serialization of an output record failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
