//! Known data-entry corrections.
//!
//! Lookups never fail: a value without a correction is returned unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pofatu_model::normalize_term;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StandardsError};

/// Errata document shipped with the crate.
pub const BUILTIN_ERRATA: &str = include_str!("../data/errata.toml");

/// A sample-name correction that only applies to rows citing `source_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScopedSampleName {
    pub source_id: String,
    pub name: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Errata {
    pub version: Option<String>,
    /// Citation keys as written in the sheets.
    pub citation_keys: BTreeMap<String, String>,
    /// Keys as stored in the BibTeX file.
    pub keys_in_bib: BTreeMap<String, String>,
    pub sample_ids: BTreeMap<String, String>,
    pub sample_names: BTreeMap<String, String>,
    pub scoped_sample_names: Vec<ScopedSampleName>,
    /// Misspelled vocabulary value to canonical term.
    pub vocabulary: BTreeMap<String, String>,
}

impl Errata {
    /// Parses the built-in errata.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_ERRATA, Path::new("<builtin errata>"))
    }

    /// Loads an errata file, replacing the built-in tables entirely.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let errata = Self::from_toml_str(&text, path)?;
        debug!(
            path = %path.display(),
            version = errata.version.as_deref().unwrap_or("-"),
            "loaded errata"
        );
        Ok(errata)
    }

    fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let mut errata: Errata = toml::from_str(text).map_err(|source| StandardsError::Toml {
            path: PathBuf::from(origin),
            source,
        })?;
        errata.vocabulary = errata
            .vocabulary
            .into_iter()
            .map(|(typo, term)| (normalize_term(&typo), term))
            .collect();
        Ok(errata)
    }

    /// Normalizes a citation key found in the sheets.
    pub fn citation_key(&self, raw: &str) -> String {
        let key = raw.trim();
        self.citation_keys
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Normalizes a key read from the bibliography.
    pub fn bib_key(&self, raw: &str) -> String {
        let key = raw.trim();
        self.keys_in_bib
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn sample_id(&self, raw: &str) -> String {
        let id = raw.trim();
        self.sample_ids
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Corrects a sample name. Corrections scoped to the row's source win
    /// over global ones.
    pub fn sample_name(&self, name: &str, source_id: Option<&str>) -> String {
        if let Some(source_id) = source_id
            && let Some(scoped) = self
                .scoped_sample_names
                .iter()
                .find(|entry| entry.source_id == source_id && entry.name == name)
        {
            return scoped.replacement.clone();
        }
        self.sample_names
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Typo map keyed by normalized misspelling, as expected by
    /// `Vocabulary::classify`.
    pub fn vocabulary_typos(&self) -> &BTreeMap<String, String> {
        &self.vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parses() {
        let errata = Errata::builtin().unwrap();
        assert_eq!(errata.citation_key(" Hunt-1998-JPS "), "Hunt-1988-JPS");
        assert_eq!(errata.citation_key("Sinton-1997-Database"), "Sinton-1997-Database");
        assert_eq!(errata.bib_key("Maxwell-2017-HNZPT"), "Hoffmann-2017-HNZPT");
        assert_eq!(
            errata.sample_id("Golitko-2013-Sepik_WNB257/ANU9000"),
            "Golitko-2013-Sepik_WNB257"
        );
    }

    #[test]
    fn test_sample_name_scoping() {
        let errata = Errata::builtin().unwrap();
        assert_eq!(errata.sample_name("Hakaea-#3", None), "HAKAEA-3");
        assert_eq!(
            errata.sample_name("AN-21", Some("Sinton-1997-Database")),
            "AN21"
        );
        assert_eq!(errata.sample_name("AN-21", Some("Other-2000-X")), "AN-21");
        assert_eq!(errata.sample_name("AN-21", None), "AN-21");
    }

    #[test]
    fn test_vocabulary_keys_are_normalized() {
        let errata =
            Errata::from_toml_str("[vocabulary]\n\"adze  prefrom\" = \"ADZE PREFORM\"\n", Path::new("t"))
                .unwrap();
        assert_eq!(
            errata.vocabulary_typos().get("ADZE PREFROM").map(String::as_str),
            Some("ADZE PREFORM")
        );
    }

    #[test]
    fn test_invalid_toml_reports_origin() {
        let err = Errata::from_toml_str("citation_keys = 3", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
