//! BibTeX bibliography index.
//!
//! Parsing is delegated to `biblatex`, which resolves `@string` macros and
//! `#` concatenation. Field values are kept as verbatim text.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use biblatex::{Bibliography, ChunksExt, Entry};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errata::Errata;
use crate::error::{Result, StandardsError};

static ENTRY_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\s*[A-Za-z]+\s*\{\s*([^,\s{}]+)\s*,").expect("Invalid BibTeX entry regex")
});

/// One bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibRecord {
    /// Citation key used by the sheets.
    pub id: String,
    /// Key as written in the BibTeX file.
    pub key: String,
    pub entry_type: String,
    /// Field values with lower-cased names and outer delimiters removed.
    pub fields: BTreeMap<String, String>,
}

impl BibRecord {
    fn from_entry(entry: &Entry, errata: &Errata) -> Self {
        let fields: BTreeMap<String, String> = entry
            .fields
            .iter()
            .map(|(name, chunks)| {
                (
                    name.to_ascii_lowercase(),
                    collapse_whitespace(&chunks.format_verbatim()),
                )
            })
            .collect();
        let raw_id = fields
            .get("annote")
            .map(String::as_str)
            .filter(|annote| !annote.trim().is_empty())
            .unwrap_or(entry.key.as_str());
        Self {
            id: errata.bib_key(raw_id),
            key: entry.key.clone(),
            entry_type: entry.entry_type.to_string().to_ascii_lowercase(),
            fields,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BibliographyIndex {
    records: BTreeMap<String, BibRecord>,
}

impl BibliographyIndex {
    /// An index with no records. The validator skips bibliography checks
    /// against an empty index.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = BibRecord>) -> Self {
        let mut index = Self::empty();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Reads a BibTeX file. A missing file yields an empty index.
    pub fn load(path: &Path, errata: &Errata) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "bibliography not found, reference checks disabled");
            return Ok(Self::empty());
        }
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let index = Self::parse(&text, path, errata)?;
        debug!(path = %path.display(), records = index.len(), "loaded bibliography");
        Ok(index)
    }

    /// Parses BibTeX text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path, errata: &Errata) -> Result<Self> {
        let bibliography = Bibliography::parse(text).map_err(|e| StandardsError::Bibtex {
            path: PathBuf::from(origin),
            key: entry_key_before(text, e.span.start).unwrap_or("-").to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_records(
            bibliography
                .iter()
                .map(|entry| BibRecord::from_entry(entry, errata)),
        ))
    }

    fn insert(&mut self, record: BibRecord) {
        if self.records.contains_key(&record.id) {
            debug!(id = %record.id, key = %record.key, "duplicate bibliography id ignored");
            return;
        }
        self.records.insert(record.id.clone(), record);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&BibRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BibRecord> {
        self.records.values()
    }
}

/// Key of the last entry that starts at or before `offset`.
fn entry_key_before(text: &str, offset: usize) -> Option<&str> {
    ENTRY_HEAD
        .captures_iter(text)
        .take_while(|head| head.get(0).is_some_and(|m| m.start() <= offset))
        .last()
        .and_then(|head| head.get(1))
        .map(|key| key.as_str())
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIB: &str = r#"
@comment{ generated }
@article{Sinton1997,
  author = {Sinton, John and Sinoto, Yosihiko},
  title = "A {Polynesian} quarry",
  year = 1997,
  annote = {Sinton-1997-Database}
}

@string{jps = "Journal of the Polynesian Society"}

@book{Maxwell-2017-HNZPT,
  title = {Hoffmann {et al.}},
  journal = jps # " 126"
}
"#;

    fn index() -> BibliographyIndex {
        BibliographyIndex::parse(BIB, Path::new("refs.bib"), &Errata::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_annote_is_record_id() {
        let index = index();
        assert_eq!(index.len(), 2);
        let record = index.get("Sinton-1997-Database").unwrap();
        assert_eq!(record.key, "Sinton1997");
        assert_eq!(record.entry_type, "article");
        assert_eq!(record.fields["title"], "A Polynesian quarry");
        assert_eq!(record.fields["year"], "1997");
    }

    #[test]
    fn test_string_macros_are_expanded() {
        let index = index();
        let record = index.get("Hoffmann-2017-HNZPT").unwrap();
        assert_eq!(record.fields["journal"], "Journal of the Polynesian Society 126");
        assert_eq!(record.fields["title"], "Hoffmann et al.");
    }

    #[test]
    fn test_bib_keys_go_through_errata() {
        let index = index();
        assert!(index.contains("Hoffmann-2017-HNZPT"));
        assert!(!index.contains("Maxwell-2017-HNZPT"));
    }

    #[test]
    fn test_unbalanced_entry_is_an_error() {
        let err = BibliographyIndex::parse(
            "@book{Broken, title = {never closed",
            Path::new("refs.bib"),
            &Errata::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StandardsError::Bibtex { ref key, .. } if key == "Broken"));
    }
}
