//! Comparison of the vocabularies sheet with the built-in term lists.

use std::collections::BTreeMap;

use pofatu_model::{Vocabulary, all_vocabularies, normalize_term};
use serde::Serialize;
use tracing::{debug, warn};

/// Differences between one built-in vocabulary and its sheet column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyDrift {
    pub vocabulary: &'static str,
    /// Built-in terms the sheet does not list.
    pub missing_from_sheet: Vec<&'static str>,
    /// Sheet terms outside the built-in list.
    pub unknown_terms: Vec<String>,
}

/// Compares sheet vocabularies, keyed by column title, with the built-in
/// ones. Titles match vocabulary names ignoring case.
///
/// Differences are logged and returned; they never fail validation.
pub fn vocabulary_drift(sheet: &BTreeMap<String, Vec<String>>) -> Vec<VocabularyDrift> {
    let mut drift = Vec::new();
    for vocabulary in all_vocabularies() {
        let wanted = normalize_term(vocabulary.name);
        let Some(terms) = sheet
            .iter()
            .find(|(title, _)| normalize_term(title) == wanted)
            .map(|(_, terms)| terms)
        else {
            debug!(vocabulary = vocabulary.name, "vocabulary not listed in sheet");
            continue;
        };

        if let Some(found) = compare(vocabulary, terms) {
            warn!(
                vocabulary = vocabulary.name,
                missing = ?found.missing_from_sheet,
                unknown = ?found.unknown_terms,
                "vocabularies sheet differs from built-in terms"
            );
            drift.push(found);
        }
    }
    drift
}

fn compare(vocabulary: &Vocabulary, terms: &[String]) -> Option<VocabularyDrift> {
    let listed: Vec<String> = terms.iter().map(|term| normalize_term(term)).collect();
    let missing_from_sheet: Vec<&'static str> = vocabulary
        .terms
        .iter()
        .copied()
        .filter(|term| !listed.contains(&normalize_term(term)))
        .collect();
    let unknown_terms: Vec<String> = terms
        .iter()
        .filter(|term| vocabulary.lookup(term).is_none())
        .cloned()
        .collect();

    (!missing_from_sheet.is_empty() || !unknown_terms.is_empty()).then_some(VocabularyDrift {
        vocabulary: vocabulary.name,
        missing_from_sheet,
        unknown_terms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_sheet_has_no_drift() {
        let sheet = BTreeMap::from([(
            "Sample category".to_string(),
            vec![
                "SOURCE".to_string(),
                "artefact".to_string(),
                "ARTEFACT USED AS SOURCE".to_string(),
            ],
        )]);
        assert!(vocabulary_drift(&sheet).is_empty());
    }

    #[test]
    fn test_drift_lists_both_directions() {
        let sheet = BTreeMap::from([(
            "SAMPLE CATEGORY".to_string(),
            vec!["SOURCE".to_string(), "ARTEFACT".to_string(), "ROCK".to_string()],
        )]);
        let drift = vocabulary_drift(&sheet);
        insta::assert_debug_snapshot!(drift, @r#"
        [
            VocabularyDrift {
                vocabulary: "sample category",
                missing_from_sheet: [
                    "ARTEFACT USED AS SOURCE",
                ],
                unknown_terms: [
                    "ROCK",
                ],
            },
        ]
        "#);
    }
}
