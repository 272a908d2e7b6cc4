//! Sheet names and the location of their flat files.

use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::flatten::{WorkbookFlattener, XlsxFlattener};

/// Excel workbook, relative to the repository root.
pub const WORKBOOK_FILE: &str = "Pofatu Dataset.xlsx";
/// Directory holding one CSV file per sheet.
pub const CSV_DIR: &str = "csv";
/// BibTeX file with the cited sources.
pub const BIBLIOGRAPHY_FILE: &str = "POFATU-references.bib";

/// The workbook sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SheetName {
    DataSource,
    SampleMetadata,
    CompositionalData,
    MethodologicalMetadata,
    Vocabularies,
}

impl SheetName {
    pub const ALL: [SheetName; 5] = [
        SheetName::DataSource,
        SheetName::SampleMetadata,
        SheetName::CompositionalData,
        SheetName::MethodologicalMetadata,
        SheetName::Vocabularies,
    ];

    /// Tab title in the workbook.
    pub fn title(self) -> &'static str {
        match self {
            SheetName::DataSource => "1 Data Source",
            SheetName::SampleMetadata => "2 Sample metadata",
            SheetName::CompositionalData => "3 Compositional data",
            SheetName::MethodologicalMetadata => "4 Methodological metadata",
            SheetName::Vocabularies => "5 Vocabularies",
        }
    }

    /// Name of the flat file: the title with spaces replaced by `_`.
    pub fn file_name(self) -> String {
        file_name_for(self.title())
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sheet| sheet.title().eq_ignore_ascii_case(title.trim()))
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Flat file name for a workbook tab title.
pub(crate) fn file_name_for(title: &str) -> String {
    format!("{}.csv", title.replace(' ', "_"))
}

/// Resolves sheet files under a repository root.
///
/// When a sheet file is missing, the workbook is flattened into the CSV
/// directory. Flattening runs at most once per source.
#[derive(Debug)]
pub struct SheetSource {
    repos: PathBuf,
    flattener: Box<dyn WorkbookFlattener>,
    flattened: Cell<bool>,
}

impl SheetSource {
    pub fn new(repos: impl Into<PathBuf>) -> Self {
        Self {
            repos: repos.into(),
            flattener: Box::new(XlsxFlattener),
            flattened: Cell::new(false),
        }
    }

    #[must_use]
    pub fn with_flattener(mut self, flattener: Box<dyn WorkbookFlattener>) -> Self {
        self.flattener = flattener;
        self
    }

    pub fn repos(&self) -> &Path {
        &self.repos
    }

    pub fn csv_dir(&self) -> PathBuf {
        self.repos.join(CSV_DIR)
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.repos.join(WORKBOOK_FILE)
    }

    pub fn bibliography_path(&self) -> PathBuf {
        self.repos.join(BIBLIOGRAPHY_FILE)
    }

    pub fn sheet_path(&self, sheet: SheetName) -> PathBuf {
        self.csv_dir().join(sheet.file_name())
    }

    /// Returns the path of the sheet's flat file, flattening the workbook
    /// first if needed.
    pub fn ensure_sheet(&self, sheet: SheetName) -> Result<PathBuf> {
        let path = self.sheet_path(sheet);
        if path.exists() {
            return Ok(path);
        }
        if !self.flattened.get() {
            self.flattened.set(true);
            let workbook = self.workbook_path();
            info!(
                workbook = %workbook.display(),
                sheet = %sheet,
                "sheet file missing, flattening workbook"
            );
            let written = self.flattener.flatten(&workbook, &self.csv_dir())?;
            info!(files = written.len(), "workbook flattened");
        }
        if path.exists() {
            Ok(path)
        } else {
            Err(IngestError::FileNotFound { path })
        }
    }
}
