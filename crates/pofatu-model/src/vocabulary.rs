//! Controlled vocabularies for free-text sheet fields.
//!
//! Each [`Vocabulary`] is a closed list of canonical terms. Classifying a raw
//! cell yields a [`Term`], which keeps "no value" ([`Term::Empty`]) apart
//! from "value outside the list" ([`Term::Unrecognized`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{ModelError, Result};

/// A named, closed list of canonical terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    pub name: &'static str,
    pub terms: &'static [&'static str],
}

pub static SAMPLE_CATEGORY: Vocabulary = Vocabulary {
    name: "sample category",
    terms: &["SOURCE", "ARTEFACT", "ARTEFACT USED AS SOURCE"],
};

pub static ARTEFACT_CATEGORY: Vocabulary = Vocabulary {
    name: "artefact category",
    terms: &[
        "ABRADER",
        "ADZE",
        "ADZE BLANK",
        "ADZE BUTT",
        "ADZE FLAKE",
        "ADZE PREFORM",
        "ADZE REJECT",
        "CHISEL",
        "COBBLE",
        "CORE",
        "FLAKE",
        "FLAKE (RETOUCHED)",
        "FLAKE WITH CORTEX",
        "FLAKE WITH GROUND SURFACE",
        "FLAKE WITH POLISHED SURFACE",
        "GRINDSTONE",
        "HAMMERSTONE",
        "NATURAL PEBBLE",
        "OVENSTONE",
        "PICK",
        "POUNDER",
        "SCRAPER",
        "SHATTER",
        "UNKNOWN",
    ],
};

pub static ARTEFACT_ATTRIBUTES: Vocabulary = Vocabulary {
    name: "artefact attributes",
    terms: &[
        "COMPLETE",
        "FRAGMENT",
        "FRAGMENT (BLADE)",
        "FRAGMENT (BUTT)",
        "FRAGMENT (DISTAL)",
        "FRAGMENT (MESIAL)",
        "FRAGMENT (PROXIMAL)",
        "REWORKED",
        "UNKNOWN",
    ],
};

pub static ARTEFACT_COLLECTION_TYPE: Vocabulary = Vocabulary {
    name: "artefact collection type",
    terms: &[
        "EXCAVATION",
        "MUSEUM COLLECTION",
        "PRIVATE COLLECTION",
        "SURVEY",
        "UNKNOWN",
    ],
};

pub static SITE_CONTEXT: Vocabulary = Vocabulary {
    name: "site context",
    terms: &[
        "AGRICULTURAL",
        "CEREMONIAL",
        "DEFENSIVE",
        "DOMESTIC",
        "FUNERAL",
        "MIDDEN",
        "NATURAL",
        "QUARRY",
        "ROCKSHELTER",
        "WORKSHOP",
        "UNKNOWN",
    ],
};

pub static ANALYZED_MATERIAL_1: Vocabulary = Vocabulary {
    name: "analyzed material 1",
    terms: &[
        "Fused disk",
        "Glass",
        "Groundmass",
        "Mineral",
        "Volcanic glass",
        "Whole rock",
    ],
};

pub static ANALYZED_MATERIAL_2: Vocabulary = Vocabulary {
    name: "analyzed material 2",
    terms: &[
        "Chip",
        "Core sample",
        "Flake",
        "Intact artefact",
        "Polished section",
        "Powder",
        "Thin section",
    ],
};

/// Every vocabulary, in sheet order.
pub fn all_vocabularies() -> [&'static Vocabulary; 7] {
    [
        &SAMPLE_CATEGORY,
        &ARTEFACT_CATEGORY,
        &ARTEFACT_ATTRIBUTES,
        &ARTEFACT_COLLECTION_TYPE,
        &SITE_CONTEXT,
        &ANALYZED_MATERIAL_1,
        &ANALYZED_MATERIAL_2,
    ]
}

/// Outcome of classifying a raw cell against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// The cell was empty.
    Empty,
    /// A canonical term from the vocabulary.
    Known(&'static str),
    /// A non-empty value outside the vocabulary, kept as written.
    Unrecognized(String),
}

impl Term {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Term::Empty => None,
            Term::Known(term) => Some(*term),
            Term::Unrecognized(value) => Some(value.as_str()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Term::Empty)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Term::Unrecognized(_))
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(value) => serializer.serialize_str(value),
            None => serializer.serialize_none(),
        }
    }
}

impl Vocabulary {
    /// Returns the canonical spelling of `value` if it belongs to the list.
    ///
    /// Matching ignores case and repeated inner whitespace.
    pub fn lookup(&self, value: &str) -> Option<&'static str> {
        let wanted = normalize_term(value);
        self.terms
            .iter()
            .copied()
            .find(|term| normalize_term(term) == wanted)
    }

    /// Classifies a raw cell, consulting `typos` (keyed by the upper-cased
    /// misspelling) before giving up.
    pub fn classify(&self, raw: Option<&str>, typos: &BTreeMap<String, String>) -> Term {
        let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Term::Empty;
        };
        if let Some(term) = self.lookup(value) {
            return Term::Known(term);
        }
        if let Some(term) = typos
            .get(&normalize_term(value))
            .and_then(|corrected| self.lookup(corrected))
        {
            return Term::Known(term);
        }
        Term::Unrecognized(value.to_string())
    }
}

/// Upper-cases a term and collapses inner whitespace, the form used for
/// vocabulary and typo-map lookups.
pub fn normalize_term(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// How unrecognized values in optional vocabulary fields are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VocabularyStrictness {
    /// Unrecognized values are an error.
    Strict,
    /// Unrecognized values are kept and reported.
    #[default]
    Lenient,
}

impl VocabularyStrictness {
    /// Applies the strictness policy to a classified term.
    pub fn check(self, vocabulary: &Vocabulary, term: Term) -> Result<Term> {
        match (self, term) {
            (VocabularyStrictness::Strict, Term::Unrecognized(value)) => {
                Err(ModelError::UnknownTerm {
                    vocabulary: vocabulary.name,
                    value,
                })
            }
            (_, term) => Ok(term),
        }
    }
}

/// Sample category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SampleCategory {
    #[serde(rename = "SOURCE")]
    Source,
    #[serde(rename = "ARTEFACT")]
    Artefact,
    #[serde(rename = "ARTEFACT USED AS SOURCE")]
    ArtefactUsedAsSource,
}

impl SampleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleCategory::Source => "SOURCE",
            SampleCategory::Artefact => "ARTEFACT",
            SampleCategory::ArtefactUsedAsSource => "ARTEFACT USED AS SOURCE",
        }
    }

    /// Parses the sample category cell.
    ///
    /// Empty cells and the `*` placeholder mean "no category". Any other value
    /// outside the vocabulary is rejected regardless of strictness.
    pub fn parse(raw: Option<&str>, typos: &BTreeMap<String, String>) -> Result<Option<Self>> {
        if raw.is_some_and(|value| value.trim() == "*") {
            return Ok(None);
        }
        match SAMPLE_CATEGORY.classify(raw, typos) {
            Term::Empty => Ok(None),
            Term::Known(term) => term.parse().map(Some),
            Term::Unrecognized(value) => Err(ModelError::InvalidSampleCategory { value }),
        }
    }
}

impl fmt::Display for SampleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_term(s).as_str() {
            "SOURCE" => Ok(SampleCategory::Source),
            "ARTEFACT" => Ok(SampleCategory::Artefact),
            "ARTEFACT USED AS SOURCE" => Ok(SampleCategory::ArtefactUsedAsSource),
            _ => Err(ModelError::InvalidSampleCategory {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typos() -> BTreeMap<String, String> {
        BTreeMap::from([("ADZE PREFROM".to_string(), "ADZE PREFORM".to_string())])
    }

    #[test]
    fn test_classify_known_ignores_case_and_spacing() {
        assert_eq!(
            ARTEFACT_CATEGORY.classify(Some(" adze   preform "), &typos()),
            Term::Known("ADZE PREFORM")
        );
        assert_eq!(
            ANALYZED_MATERIAL_1.classify(Some("WHOLE ROCK"), &typos()),
            Term::Known("Whole rock")
        );
    }

    #[test]
    fn test_classify_uses_typo_map() {
        assert_eq!(
            ARTEFACT_CATEGORY.classify(Some("Adze prefrom"), &typos()),
            Term::Known("ADZE PREFORM")
        );
    }

    #[test]
    fn test_classify_empty_and_unrecognized() {
        assert_eq!(SITE_CONTEXT.classify(None, &typos()), Term::Empty);
        assert_eq!(SITE_CONTEXT.classify(Some("  "), &typos()), Term::Empty);
        assert_eq!(
            SITE_CONTEXT.classify(Some("Beach"), &typos()),
            Term::Unrecognized("Beach".to_string())
        );
    }

    #[test]
    fn test_strictness() {
        let term = Term::Unrecognized("Beach".to_string());
        assert!(
            VocabularyStrictness::Lenient
                .check(&SITE_CONTEXT, term.clone())
                .is_ok()
        );
        let err = VocabularyStrictness::Strict
            .check(&SITE_CONTEXT, term)
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnknownTerm {
                vocabulary: "site context",
                ..
            }
        ));
        assert_eq!(
            VocabularyStrictness::Strict
                .check(&SITE_CONTEXT, Term::Empty)
                .unwrap(),
            Term::Empty
        );
    }

    #[test]
    fn test_sample_category() {
        let typos = BTreeMap::new();
        assert_eq!(
            SampleCategory::parse(Some("artefact used as source"), &typos).unwrap(),
            Some(SampleCategory::ArtefactUsedAsSource)
        );
        assert_eq!(SampleCategory::parse(Some("*"), &typos).unwrap(), None);
        assert_eq!(SampleCategory::parse(None, &typos).unwrap(), None);
        assert!(SampleCategory::parse(Some("ROCK"), &typos).is_err());
    }
}
