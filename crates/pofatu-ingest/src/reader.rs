//! Row-oriented access to a sheet's flat file.
//!
//! Physical rows 0 and 1 are informational, row 2 holds the top header,
//! row 3 the sub-header. Data starts at row 4.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use crate::error::{IngestError, Result};
use crate::sheet::{SheetName, SheetSource};

/// Physical index of the top header row.
const TOP_HEADER_ROW: usize = 2;
/// Physical index of the sub-header row.
const SUB_HEADER_ROW: usize = 3;
/// Raw cell value meaning "no value".
const MISSING_CELL: &str = "NA";

/// The two header rows of a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetHeader {
    pub top: Vec<Option<String>>,
    pub sub: Vec<Option<String>>,
}

impl SheetHeader {
    pub fn new(top: Vec<Option<String>>, sub: Vec<Option<String>>) -> Self {
        Self { top, sub }
    }

    /// Number of columns covered by either header row.
    pub fn len(&self) -> usize {
        self.top.len().max(self.sub.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn top(&self, column: usize) -> Option<&str> {
        self.top.get(column).and_then(Option::as_deref)
    }

    pub fn sub(&self, column: usize) -> Option<&str> {
        self.sub.get(column).and_then(Option::as_deref)
    }

    /// Column whose sub-header is `label` (trimmed, case-insensitive).
    pub fn position(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.sub
            .iter()
            .position(|cell| cell.as_deref().is_some_and(|sub| sub.trim().eq_ignore_ascii_case(label)))
    }

    /// Column whose top header is `label` (trimmed, case-insensitive).
    pub fn top_position(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.top
            .iter()
            .position(|cell| cell.as_deref().is_some_and(|top| top.trim().eq_ignore_ascii_case(label)))
    }

    /// Display name of a column: the sub-header, else the top header.
    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.sub(column).or_else(|| self.top(column))
    }
}

/// One data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub sheet: SheetName,
    /// Physical row index in the sheet.
    pub index: usize,
    pub header: Arc<SheetHeader>,
    /// Cell values; empty and `NA` cells are `None`.
    pub cells: Vec<Option<String>>,
}

impl SheetRow {
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(Option::as_deref)
    }

    pub fn text(&self, column: usize) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    /// Value of the column whose sub-header is `label`.
    pub fn by_label(&self, label: &str) -> Option<&str> {
        self.header.position(label).and_then(|column| self.get(column))
    }

    /// Replaces a cell, growing the row when needed.
    pub fn set(&mut self, column: usize, value: Option<String>) {
        if column >= self.cells.len() {
            self.cells.resize(column + 1, None);
        }
        self.cells[column] = value;
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// Reads one sheet of a [`SheetSource`].
#[derive(Debug, Clone, Copy)]
pub struct SheetReader<'a> {
    source: &'a SheetSource,
    sheet: SheetName,
}

impl<'a> SheetReader<'a> {
    pub fn new(source: &'a SheetSource, sheet: SheetName) -> Self {
        Self { source, sheet }
    }

    pub fn sheet(&self) -> SheetName {
        self.sheet
    }

    /// Opens the sheet and returns its data rows.
    ///
    /// Every call reads the file from the start.
    pub fn rows(&self) -> Result<SheetRows> {
        let path = self.source.ensure_sheet(self.sheet)?;
        SheetRows::open(self.sheet, path)
    }

    pub fn header(&self) -> Result<Arc<SheetHeader>> {
        Ok(self.rows()?.header())
    }
}

/// Lazy iterator over the data rows of a sheet.
pub struct SheetRows {
    sheet: SheetName,
    path: PathBuf,
    header: Arc<SheetHeader>,
    records: StringRecordsIntoIter<File>,
    index: usize,
}

impl SheetRows {
    fn open(sheet: SheetName, path: PathBuf) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|source| csv_error(&path, source))?;
        let mut records = reader.into_records();

        let mut top = None;
        let mut sub = None;
        for index in 0..=SUB_HEADER_ROW {
            let Some(record) = records.next() else {
                return Err(IngestError::MissingHeader { path });
            };
            let record = record.map_err(|source| csv_error(&path, source))?;
            match index {
                TOP_HEADER_ROW => top = Some(cells(&record)),
                SUB_HEADER_ROW => sub = Some(cells(&record)),
                _ => {}
            }
        }

        Ok(Self {
            sheet,
            header: Arc::new(SheetHeader::new(
                top.unwrap_or_default(),
                sub.unwrap_or_default(),
            )),
            path,
            records,
            index: SUB_HEADER_ROW + 1,
        })
    }

    pub fn header(&self) -> Arc<SheetHeader> {
        Arc::clone(&self.header)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for SheetRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetRows")
            .field("sheet", &self.sheet)
            .field("path", &self.path)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Iterator for SheetRows {
    type Item = Result<SheetRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let index = self.index;
        self.index += 1;
        Some(
            record
                .map(|record| SheetRow {
                    sheet: self.sheet,
                    index,
                    header: Arc::clone(&self.header),
                    cells: cells(&record),
                })
                .map_err(|source| csv_error(&self.path, source)),
        )
    }
}

fn cells(record: &StringRecord) -> Vec<Option<String>> {
    record
        .iter()
        .map(|cell| {
            let cell = cell.trim_matches('\u{feff}').trim();
            if cell.is_empty() || cell == MISSING_CELL {
                None
            } else {
                Some(cell.to_string())
            }
        })
        .collect()
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> SheetHeader {
        SheetHeader::new(
            vec![Some("SAMPLE".to_string()), None, Some("LOCATION".to_string())],
            vec![
                Some("Sample ID".to_string()),
                Some("Sample name".to_string()),
                Some("Latitude".to_string()),
            ],
        )
    }

    #[test]
    fn test_header_lookup() {
        let header = header();
        assert_eq!(header.position(" sample id "), Some(0));
        assert_eq!(header.position("Longitude"), None);
        assert_eq!(header.top_position("location"), Some(2));
        assert_eq!(header.column_name(1), Some("Sample name"));
        assert_eq!(header.len(), 3);
    }

    #[test]
    fn test_row_access() {
        let mut row = SheetRow {
            sheet: SheetName::SampleMetadata,
            index: 4,
            header: Arc::new(header()),
            cells: vec![Some("S1".to_string()), None],
        };
        assert_eq!(row.by_label("Sample ID"), Some("S1"));
        assert_eq!(row.by_label("Latitude"), None);
        row.set(2, Some("-8.8".to_string()));
        assert_eq!(row.get(2), Some("-8.8"));
        assert!(!row.is_blank());
    }

    #[test]
    fn test_cells_drop_missing_markers() {
        let record = StringRecord::from(vec!["\u{feff}S1", " NA ", "", " x "]);
        assert_eq!(
            cells(&record),
            vec![Some("S1".to_string()), None, None, Some("x".to_string())]
        );
    }
}
