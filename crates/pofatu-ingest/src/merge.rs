//! Grouping rows by key columns and merging each group into one row.
//!
//! Merging fills gaps in the first row of a group from later rows. Two
//! different non-empty values for the same column cancel each other: the
//! column is cleared and stays cleared for the rest of the group.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::reader::SheetRow;
use crate::sheet::SheetName;

/// Columns whose values identify a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    columns: Vec<usize>,
}

impl GroupKey {
    pub fn new(columns: impl Into<Vec<usize>>) -> Self {
        Self {
            columns: columns.into(),
        }
    }

    pub fn single(column: usize) -> Self {
        Self::new(vec![column])
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Key of a row, or `None` when every key column is empty.
    pub fn key_of(&self, row: &SheetRow) -> Option<Vec<String>> {
        let key: Vec<String> = self
            .columns
            .iter()
            .map(|column| row.get(*column).unwrap_or_default().to_string())
            .collect();
        key.iter().any(|part| !part.is_empty()).then_some(key)
    }
}

/// Rows sharing one key, in physical order.
#[derive(Debug, Clone)]
pub struct RowGroup {
    pub key: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// Materializes `rows` and groups them by `key`, sorted by key.
///
/// Rows whose key columns are all empty are dropped.
pub fn group_rows<I>(rows: I, key: &GroupKey) -> Result<Vec<RowGroup>>
where
    I: IntoIterator<Item = Result<SheetRow>>,
{
    let mut groups: BTreeMap<Vec<String>, Vec<SheetRow>> = BTreeMap::new();
    for row in rows {
        let row = row?;
        if let Some(group_key) = key.key_of(&row) {
            groups.entry(group_key).or_default().push(row);
        }
    }
    Ok(groups
        .into_iter()
        .map(|(key, rows)| RowGroup { key, rows })
        .collect())
}

/// Two rows of a group disagreeing on a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeConflict {
    pub sheet: SheetName,
    /// Physical index of the row carrying the incoming value.
    pub row_index: usize,
    pub column: usize,
    pub header: Option<String>,
    /// Value held before the conflict; `None` once the column is cancelled.
    pub kept: Option<String>,
    pub incoming: String,
}

/// A merged group.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub row: SheetRow,
    pub conflicts: Vec<MergeConflict>,
    /// Physical indices of the rows merged into `row`.
    pub source_rows: Vec<usize>,
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Merges a group into its first row.
///
/// Returns `None` for an empty group. Conflicts are logged and returned,
/// never raised.
pub fn merge_group(group: RowGroup) -> Option<MergeOutcome> {
    let mut rows = group.rows.into_iter();
    let mut seed = rows.next()?;
    let mut source_rows = vec![seed.index];
    let mut cancelled = BTreeSet::new();
    let mut conflicts = Vec::new();

    for row in rows {
        source_rows.push(row.index);
        for (column, incoming) in row.cells.iter().enumerate() {
            let Some(incoming) = incoming else {
                continue;
            };
            if cancelled.contains(&column) {
                conflicts.push(conflict(&seed, &row, column, None, incoming));
                continue;
            }
            match seed.get(column) {
                None => seed.set(column, Some(incoming.clone())),
                Some(kept) if kept == incoming => {}
                Some(kept) => {
                    let kept = kept.to_string();
                    conflicts.push(conflict(&seed, &row, column, Some(kept), incoming));
                    seed.set(column, None);
                    cancelled.insert(column);
                }
            }
        }
    }

    Some(MergeOutcome {
        row: seed,
        conflicts,
        source_rows,
    })
}

fn conflict(
    seed: &SheetRow,
    row: &SheetRow,
    column: usize,
    kept: Option<String>,
    incoming: &str,
) -> MergeConflict {
    let header = seed.header.column_name(column).map(str::to_string);
    warn!(
        sheet = %row.sheet,
        row = row.index,
        column,
        header = header.as_deref().unwrap_or("-"),
        kept = kept.as_deref().unwrap_or("<cancelled>"),
        incoming,
        "conflicting values in merged rows, clearing column"
    );
    MergeConflict {
        sheet: row.sheet,
        row_index: row.index,
        column,
        header,
        kept,
        incoming: incoming.to_string(),
    }
}
