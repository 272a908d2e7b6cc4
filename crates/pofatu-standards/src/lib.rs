//! Errata tables and bibliography for the Pofatu dataset.
//!
//! The errata are a versioned TOML document (a built-in copy ships with the
//! crate) that corrects known data-entry mistakes in citation keys, sample
//! ids, sample names and vocabulary terms. The bibliography index answers
//! "is this citation key in the BibTeX file?" for the validator.

#![deny(unsafe_code)]

pub mod bibliography;
pub mod errata;
pub mod error;

pub use bibliography::{BibRecord, BibliographyIndex};
pub use errata::{Errata, ScopedSampleName};
pub use error::{Result, StandardsError};

/// Environment variable that points to an errata file replacing the built-in copy.
pub const ERRATA_ENV_VAR: &str = "POFATU_ERRATA";
