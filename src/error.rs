//! Error types for the crossval toolkit

use thiserror::Error;

/// Result type alias for crossval operations
pub type Result<T> = std::result::Result<T, CrossvalError>;

/// Main error type for the crossval toolkit
#[derive(Error, Debug)]
pub enum CrossvalError {
    /// Partition fractions are malformed (negative, duplicate labels, or
    /// summing past 1 beyond tolerance). Surfaced before any repetition runs.
    #[error("Invalid proportions: {0}")]
    InvalidProportions(String),

    /// An operation was invoked on a zero-row dataset.
    #[error("Empty dataset")]
    EmptyDataset,

    /// A fitting routine could not produce a model for a given subset.
    /// Recovered per repetition by the fit runner; never aborts a batch.
    #[error("Fit failure: {0}")]
    FitFailure(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}
