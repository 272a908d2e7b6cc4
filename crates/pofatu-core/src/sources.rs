//! Contributions and references from the data source sheet.
//!
//! Columns: 0 dataset code, 1 title, 2 abstract, 3 authors, 4 affiliations,
//! 5 contributors, 6 contact, then three `(citation key, citation, DOI)`
//! triples starting at columns 7, 10 and 13.

use std::collections::BTreeMap;

use pofatu_common::semicolon_split;
use pofatu_ingest::{GroupKey, RowGroup, SheetRow};
use pofatu_model::{Contribution, Reference};
use pofatu_standards::Errata;
use tracing::debug;

const CODE: usize = 0;
const TITLE: usize = 1;
const ABSTRACT: usize = 2;
const AUTHORS: usize = 3;
const AFFILIATIONS: usize = 4;
const CONTRIBUTORS: usize = 5;
const CONTACT: usize = 6;
const REFERENCE_TRIPLES: [usize; 3] = [7, 10, 13];

/// Builds one contribution per group.
///
/// Later rows only fill fields left empty by earlier rows.
pub(crate) fn build_contribution(group: &RowGroup, errata: &Errata) -> Option<Contribution> {
    let id = group.key.first().filter(|id| !id.is_empty())?.clone();
    let field = |column: usize| first_non_empty(&group.rows, column, &id);

    let mut source_ids: Vec<String> = Vec::new();
    for row in &group.rows {
        for key in reference_keys(row, errata) {
            if !source_ids.contains(&key) {
                source_ids.push(key);
            }
        }
    }

    Some(Contribution {
        name: field(TITLE),
        description: field(ABSTRACT),
        authors: field(AUTHORS),
        affiliations: field(AFFILIATIONS),
        contributors: semicolon_split(field(CONTRIBUTORS).as_deref()),
        contact: field(CONTACT),
        source_ids,
        id,
    })
}

/// Normalizes the dataset code cell so that rows group by corrected key.
pub(crate) fn normalize_code(mut row: SheetRow, errata: &Errata) -> SheetRow {
    if let Some(code) = row.get(CODE).map(|code| errata.citation_key(code)) {
        row.set(CODE, Some(code));
    }
    row
}

pub(crate) fn contribution_key() -> GroupKey {
    GroupKey::single(CODE)
}

fn first_non_empty(rows: &[SheetRow], column: usize, id: &str) -> Option<String> {
    let mut values = rows.iter().filter_map(|row| row.get(column));
    let first = values.next()?;
    for other in values.filter(|value| *value != first) {
        debug!(contribution = id, column, kept = first, ignored = other, "differing contribution field");
    }
    Some(first.to_string())
}

fn reference_keys<'a>(row: &'a SheetRow, errata: &'a Errata) -> impl Iterator<Item = String> + 'a {
    REFERENCE_TRIPLES
        .into_iter()
        .filter_map(|column| row.get(column))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(move |key| errata.citation_key(key))
}

/// Collects references across rows in physical order; the first citation
/// seen for a key wins.
#[derive(Debug, Default)]
pub(crate) struct ReferenceCollector {
    references: Vec<Reference>,
    positions: BTreeMap<String, usize>,
}

impl ReferenceCollector {
    pub(crate) fn add_row(&mut self, row: &SheetRow, errata: &Errata) {
        for column in REFERENCE_TRIPLES {
            let Some(key) = row.get(column).map(str::trim).filter(|key| !key.is_empty()) else {
                continue;
            };
            let id = errata.citation_key(key);
            let citation = row.text(column + 1);
            if let Some(position) = self.positions.get(&id) {
                let kept = &self.references[*position];
                if kept.citation != citation {
                    debug!(
                        reference = %id,
                        row = row.index,
                        kept = kept.citation.as_deref().unwrap_or("-"),
                        ignored = citation.as_deref().unwrap_or("-"),
                        "differing citation for reference, first occurrence kept"
                    );
                }
                continue;
            }
            self.positions.insert(id.clone(), self.references.len());
            self.references.push(Reference {
                id,
                citation,
                doi: row.text(column + 2),
            });
        }
    }

    pub(crate) fn finish(self) -> Vec<Reference> {
        self.references
    }
}
