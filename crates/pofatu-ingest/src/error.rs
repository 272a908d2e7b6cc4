//! Error types for sheet ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading the workbook sheets.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Flat sheet file missing even after flattening the workbook.
    #[error("sheet file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Workbook Errors ===
    #[error("workbook not found: {path}")]
    WorkbookNotFound { path: PathBuf },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    // === CSV Errors ===
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file ends before both header rows were read.
    #[error("missing header rows in {path}")]
    MissingHeader { path: PathBuf },

    // === Parameter Errors ===
    #[error("duplicate parameter column '{parameter}'")]
    DuplicateParameter { parameter: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/repos/csv/1_Data_Source.csv"),
        };
        assert_eq!(
            err.to_string(),
            "sheet file not found: /repos/csv/1_Data_Source.csv"
        );
        let err = IngestError::DuplicateParameter {
            parameter: "SiO2 [wt%]".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate parameter column 'SiO2 [wt%]'");
    }
}
