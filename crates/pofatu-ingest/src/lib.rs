//! Reading the Pofatu workbook sheets.
//!
//! # Features
//!
//! - **Sheet sources**: locate the flat CSV file of each sheet, flattening the
//!   Excel workbook once when the files are missing
//! - **Sheet reader**: two fixed header rows, lazy iteration over data rows
//! - **Row merging**: group rows by key columns and merge each group with
//!   cancel-on-mismatch conflict handling
//! - **Parameter index**: measured parameters of the compositional sheet
//!
//! # Example
//!
//! ```ignore
//! use pofatu_ingest::{GroupKey, SheetName, SheetReader, SheetSource, group_rows, merge_group};
//!
//! let source = SheetSource::new("pofatu-data");
//! let reader = SheetReader::new(&source, SheetName::DataSource);
//! for group in group_rows(reader.rows()?, &GroupKey::single(0))? {
//!     let merged = merge_group(group);
//! }
//! ```

mod error;
mod flatten;
mod merge;
mod params;
mod reader;
mod sheet;

// === Error Types ===
pub use error::{IngestError, Result};

// === Sheets ===
pub use sheet::{BIBLIOGRAPHY_FILE, CSV_DIR, SheetName, SheetSource, WORKBOOK_FILE};

// === Workbook Flattening ===
pub use flatten::{WorkbookFlattener, XlsxFlattener};

// === Reading ===
pub use reader::{SheetHeader, SheetReader, SheetRow, SheetRows};

// === Merging ===
pub use merge::{GroupKey, MergeConflict, MergeOutcome, RowGroup, group_rows, merge_group};

// === Parameters ===
pub use params::{PARAMETER_MARKER, ParameterColumn, ParameterIndex};
