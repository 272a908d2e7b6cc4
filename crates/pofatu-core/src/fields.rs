//! Field-level conversion of sheet cells.

use pofatu_common::{almost_float, semicolon_split};
use pofatu_ingest::SheetRow;
use pofatu_model::{ModelError, Term, Vocabulary, VocabularyStrictness};
use pofatu_standards::Errata;
use tracing::warn;

use crate::error::BuildError;
use crate::options::BuildOptions;

/// Id cells holding one of these values mark a row to skip.
pub(crate) const PLACEHOLDER_IDS: &[&str] = &["*", "-", "?"];

pub(crate) fn is_placeholder(value: Option<&str>) -> bool {
    value.is_none_or(|value| {
        let value = value.trim();
        value.is_empty() || PLACEHOLDER_IDS.contains(&value)
    })
}

/// Reads the fields of one row, addressing cells by sub-header label.
pub(crate) struct Fields<'a> {
    row: &'a SheetRow,
    errata: &'a Errata,
    options: BuildOptions,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(row: &'a SheetRow, errata: &'a Errata, options: BuildOptions) -> Self {
        Self {
            row,
            errata,
            options,
        }
    }

    pub(crate) fn errata(&self) -> &'a Errata {
        self.errata
    }

    pub(crate) fn raw(&self, label: &str) -> Option<&'a str> {
        self.row.by_label(label)
    }

    pub(crate) fn text(&self, label: &str) -> Option<String> {
        self.raw(label).map(str::to_string)
    }

    pub(crate) fn float(&self, label: &str) -> Result<Option<f64>, BuildError> {
        almost_float(self.raw(label)).map_err(|e| self.invalid(label, e.into()))
    }

    /// Semicolon-separated citation keys, normalized through the errata.
    pub(crate) fn citation_keys(&self, label: &str) -> Vec<String> {
        semicolon_split(self.raw(label))
            .iter()
            .map(|key| self.errata.citation_key(key))
            .collect()
    }

    pub(crate) fn citation_key(&self, label: &str) -> Option<String> {
        self.raw(label).map(|key| self.errata.citation_key(key))
    }

    /// Classifies a vocabulary field and applies the strictness policy.
    pub(crate) fn term(&self, vocabulary: &Vocabulary, label: &str) -> Result<Term, BuildError> {
        let term = vocabulary.classify(self.raw(label), self.errata.vocabulary_typos());
        if let Term::Unrecognized(value) = &term
            && self.options.strictness == VocabularyStrictness::Lenient
        {
            warn!(
                sheet = %self.row.sheet,
                row = self.row.index,
                column = label,
                vocabulary = vocabulary.name,
                value = value.as_str(),
                "value outside vocabulary kept as written"
            );
        }
        self.options
            .strictness
            .check(vocabulary, term)
            .map_err(|e| self.invalid(label, e))
    }

    pub(crate) fn invalid(&self, label: &str, source: ModelError) -> BuildError {
        BuildError::InvalidCell {
            sheet: self.row.sheet,
            row: self.row.index,
            column: label.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder(None));
        assert!(is_placeholder(Some(" * ")));
        assert!(is_placeholder(Some("")));
        assert!(!is_placeholder(Some("S1")));
    }
}
