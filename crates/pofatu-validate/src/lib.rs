//! Cross-reference validation for Pofatu datasets.
//!
//! [`validate`] checks built entities against each other and against the
//! bibliography. Problems are either raised (no sink) or reported to a
//! [`ProblemSink`] and counted.
//!
//! # Example
//!
//! ```ignore
//! use pofatu_validate::{TracingSink, ValidationInput, validate};
//!
//! let snapshot = dataset.load()?;
//! let bib = dataset.bibliography()?;
//! let problems = validate(
//!     &ValidationInput::from_snapshot(&snapshot),
//!     &bib,
//!     Some(&mut TracingSink),
//! )?;
//! ```

mod drift;
mod error;
mod problem;
mod validator;

// === Errors ===
pub use error::{Result, ValidationError};

// === Problems ===
pub use problem::{CollectingSink, Problem, ProblemKind, ProblemSink, TracingSink};

// === Checks ===
pub use drift::{VocabularyDrift, vocabulary_drift};
pub use validator::{ValidationInput, validate};
