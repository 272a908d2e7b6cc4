//! Pofatu data model.
//!
//! Typed records for the entities described by the dataset workbook:
//! contributions and references (data source sheet), samples with their
//! owned location, artefact and site (sample metadata sheet), methods
//! (methodological metadata sheet) and analyses with measurements
//! (compositional data sheet).

pub mod analysis;
pub mod contribution;
pub mod error;
pub mod location;
pub mod method;
pub mod sample;
pub mod vocabulary;

pub use analysis::{Analysis, AnalysisRegistry, Measurement};
pub use contribution::{Contribution, Reference};
pub use error::{ModelError, Result};
pub use location::Location;
pub use method::{Method, MethodKey, MethodReference, parameter_head_word};
pub use sample::{Artefact, Sample, Site};
pub use vocabulary::{
    ANALYZED_MATERIAL_1, ANALYZED_MATERIAL_2, ARTEFACT_ATTRIBUTES, ARTEFACT_CATEGORY,
    ARTEFACT_COLLECTION_TYPE, SAMPLE_CATEGORY, SITE_CONTEXT, SampleCategory, Term, Vocabulary,
    VocabularyStrictness, all_vocabularies, normalize_term,
};
