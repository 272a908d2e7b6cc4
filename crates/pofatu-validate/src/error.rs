//! Error types for validation.

use thiserror::Error;

use crate::problem::Problem;

#[derive(Debug, Error)]
pub enum ValidationError {
    /// First non-fatal problem, raised when no sink collects problems.
    #[error("{0}")]
    Problem(Problem),

    // === Fatal ===
    #[error("duplicate analysis id: {id}")]
    DuplicateAnalysis { id: String },

    #[error("duplicate measurement of {parameter} in analysis {analysis}")]
    DuplicateMeasurement { analysis: String, parameter: String },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
