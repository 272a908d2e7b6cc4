//! Flattening the Excel workbook into one CSV file per sheet.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::sheet::file_name_for;

/// Writes every worksheet of a workbook as a CSV file into a directory.
pub trait WorkbookFlattener: fmt::Debug {
    /// Returns the paths of the files written.
    fn flatten(&self, workbook: &Path, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Default flattener backed by `calamine`.
///
/// Cells keep their physical position: leading empty rows and columns that
/// the worksheet range omits are written out as empty cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxFlattener;

impl WorkbookFlattener for XlsxFlattener {
    fn flatten(&self, workbook: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        if !workbook.exists() {
            return Err(IngestError::WorkbookNotFound {
                path: workbook.to_path_buf(),
            });
        }
        let workbook_error = |message: String| IngestError::Workbook {
            path: workbook.to_path_buf(),
            message,
        };
        let mut excel: Xlsx<BufReader<File>> =
            open_workbook(workbook).map_err(|e: XlsxError| workbook_error(e.to_string()))?;
        std::fs::create_dir_all(out_dir).map_err(|source| IngestError::FileWrite {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for name in excel.sheet_names() {
            let range = excel
                .worksheet_range(&name)
                .map_err(|e| workbook_error(format!("sheet '{name}': {e}")))?;
            let path = out_dir.join(file_name_for(&name));
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&path)
                .map_err(|source| IngestError::CsvWrite {
                    path: path.clone(),
                    source,
                })?;
            let write_error = |source| IngestError::CsvWrite {
                path: path.clone(),
                source,
            };

            let (first_row, first_col) = range.start().unwrap_or((0, 0));
            for _ in 0..first_row {
                writer.write_record([""]).map_err(write_error)?;
            }
            for row in range.rows() {
                let record = std::iter::repeat_n(String::new(), first_col as usize)
                    .chain(row.iter().map(cell_text));
                writer.write_record(record).map_err(write_error)?;
            }
            writer.flush().map_err(|source| IngestError::FileWrite {
                path: path.clone(),
                source,
            })?;
            debug!(sheet = %name, rows = range.height(), path = %path.display(), "wrote sheet");
            written.push(path);
        }
        Ok(written)
    }
}

/// Text of a cell as it would be typed in the sheet.
fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => float_text(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => float_text(dt.as_f64()),
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}

/// Integral floats are written without a fractional part (`12`, not `12.0`).
fn float_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(-0.25)), "-0.25");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("≤0.3".to_string())), "≤0.3");
    }

    #[test]
    fn test_missing_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let err = XlsxFlattener
            .flatten(&dir.path().join("Pofatu Dataset.xlsx"), dir.path())
            .unwrap_err();
        assert!(matches!(err, IngestError::WorkbookNotFound { .. }));
    }

    #[test]
    fn test_unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = dir.path().join("Pofatu Dataset.xlsx");
        std::fs::write(&workbook, "not a zip archive").unwrap();

        let err = XlsxFlattener
            .flatten(&workbook, &dir.path().join("csv"))
            .unwrap_err();
        match err {
            IngestError::Workbook { path, .. } => assert_eq!(path, workbook),
            other => panic!("unexpected error: {other}"),
        }
    }
}
