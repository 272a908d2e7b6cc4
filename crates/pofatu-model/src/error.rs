use pofatu_common::ValueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown {vocabulary} value '{value}'")]
    UnknownTerm {
        vocabulary: &'static str,
        value: String,
    },

    #[error("invalid sample category '{value}'")]
    InvalidSampleCategory { value: String },

    #[error("{axis} {value} is outside the valid range")]
    CoordinateOutOfRange { axis: &'static str, value: f64 },

    #[error("sigma level must be 1 or 2, got {value}")]
    InvalidSigma { value: u8 },

    #[error("duplicate measurement of '{parameter}' in analysis {analysis}")]
    DuplicateMeasurement { analysis: String, parameter: String },

    #[error("duplicate analysis id {id}")]
    DuplicateAnalysis { id: String },

    #[error(transparent)]
    Value(#[from] ValueError),
}

pub type Result<T> = std::result::Result<T, ModelError>;
