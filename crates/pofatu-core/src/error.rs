//! Error types for entity building.

use pofatu_ingest::{IngestError, SheetName};
use pofatu_model::ModelError;
use pofatu_standards::StandardsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Standards(#[from] StandardsError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// A cell could not be turned into a field value.
    #[error("{sheet} row {row}, column '{column}': {source}")]
    InvalidCell {
        sheet: SheetName,
        row: usize,
        column: String,
        #[source]
        source: ModelError,
    },

    /// A sheet lacks a column every row is keyed on.
    #[error("{sheet}: no '{column}' column in the sub-header")]
    MissingColumn { sheet: SheetName, column: &'static str },

    /// Two rows share a sample id but differ in content.
    #[error("conflicting rows {first} and {second} for sample {id}")]
    ConflictingSample {
        id: String,
        first: usize,
        second: usize,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cell_display() {
        let err = BuildError::InvalidCell {
            sheet: SheetName::SampleMetadata,
            row: 7,
            column: "Sample category".to_string(),
            source: ModelError::InvalidSampleCategory {
                value: "ROCK".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "2 Sample metadata row 7, column 'Sample category': invalid sample category 'ROCK'"
        );
    }
}
