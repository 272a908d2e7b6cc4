//! Building Pofatu entities from the workbook sheets.
//!
//! [`Dataset`] ties together a repository directory, the errata tables and
//! the build options. Each of its operations reads one sheet and turns the
//! rows into model records:
//!
//! - **Contributions / references**: data source sheet, grouped by dataset code
//! - **Methods**: methodological metadata sheet, grouped by code and parameter
//! - **Samples**: sample metadata sheet, one sample per unique id
//! - **Analyses**: compositional data sheet, merged per sample and method and
//!   built lazily by [`AnalysisIter`]
//!
//! # Example
//!
//! ```ignore
//! use pofatu_core::{BuildOptions, Dataset};
//! use pofatu_standards::Errata;
//!
//! let dataset = Dataset::new("pofatu-data")
//!     .with_errata(Errata::builtin()?)
//!     .with_options(BuildOptions::strict());
//! let samples = dataset.samples()?;
//! let methods = dataset.methods()?;
//! for analysis in dataset.analyses(&samples, &methods)? {
//!     println!("{}", analysis?.id);
//! }
//! ```

mod analyses;
mod dataset;
mod error;
mod fields;
mod methods;
mod options;
mod samples;
mod snapshot;
mod sources;

pub use analyses::{AnalysisIter, CompositionalGroup, MergeSummary, collect_conflicts};
pub use dataset::Dataset;
pub use error::{BuildError, Result};
pub use options::BuildOptions;
pub use snapshot::{DatasetSnapshot, SnapshotCounts};
