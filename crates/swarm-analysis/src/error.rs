//! Error types for swarm-analysis.

use thiserror::Error;

/// Errors that can occur when writing analysis output.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, AnalysisError>`.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
