//! Reading sheet files from a repository directory.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pofatu_ingest::{
    GroupKey, IngestError, ParameterIndex, SheetName, SheetReader, SheetSource, WorkbookFlattener,
    group_rows, merge_group,
};

const COMPOSITIONAL: &str = "\
Pofatu compositional data,,,,
release,,,,
SAMPLE,METHOD,PARAMETER,SiO2,Al2O3
Sample ID,Method code,,wt%,wt%
S1,M1,,45.2,NA
S1,M1,,47.0,12.1
S2,M1,,<0.5,
";

fn write_sheet(repos: &Path, sheet: SheetName, contents: &str) {
    let dir = repos.join("csv");
    fs::create_dir_all(&dir).expect("create csv dir");
    fs::write(dir.join(sheet.file_name()), contents).expect("write sheet");
}

#[test]
fn rows_start_after_headers_and_rereading_is_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_sheet(dir.path(), SheetName::CompositionalData, COMPOSITIONAL);
    let source = SheetSource::new(dir.path());
    let reader = SheetReader::new(&source, SheetName::CompositionalData);

    let first: Vec<_> = reader
        .rows()
        .expect("open")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows");
    let second: Vec<_> = reader
        .rows()
        .expect("reopen")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows");

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(first[0].index, 4);
    assert_eq!(first[0].get(4), None);
    assert_eq!(first[2].get(3), Some("<0.5"));
    assert_eq!(first[0].header.sub(3), Some("wt%"));
}

#[test]
fn merge_scenario_clears_conflicting_parameter() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_sheet(dir.path(), SheetName::CompositionalData, COMPOSITIONAL);
    let source = SheetSource::new(dir.path());
    let reader = SheetReader::new(&source, SheetName::CompositionalData);

    let index = ParameterIndex::build(&reader.header().expect("header")).expect("parameters");
    let sio2 = index.get("SiO2 [wt%]").expect("SiO2").column;
    let al2o3 = index.get("Al2O3 [wt%]").expect("Al2O3").column;

    let groups = group_rows(reader.rows().expect("rows"), &GroupKey::new([0, 1])).expect("group");
    assert_eq!(groups.len(), 2);
    let merged = groups
        .into_iter()
        .filter_map(merge_group)
        .find(|outcome| outcome.row.get(0) == Some("S1"))
        .expect("S1 group");

    assert_eq!(merged.row.get(sio2), None);
    assert_eq!(merged.row.get(al2o3), Some("12.1"));
    assert_eq!(merged.conflicts.len(), 1);
    insta::assert_snapshot!(
        format!("{:?}", merged.conflicts[0]),
        @r#"MergeConflict { sheet: CompositionalData, row_index: 5, column: 3, header: Some("wt%"), kept: Some("45.2"), incoming: "47.0" }"#
    );
}

#[test]
fn short_file_is_missing_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_sheet(dir.path(), SheetName::DataSource, "title\n\nCODE\n");
    let source = SheetSource::new(dir.path());
    let err = SheetReader::new(&source, SheetName::DataSource)
        .rows()
        .unwrap_err();
    assert!(matches!(err, IngestError::MissingHeader { .. }));
}

#[derive(Debug)]
struct CountingFlattener {
    calls: Rc<Cell<usize>>,
}

impl WorkbookFlattener for CountingFlattener {
    fn flatten(&self, _workbook: &Path, out_dir: &Path) -> pofatu_ingest::Result<Vec<PathBuf>> {
        self.calls.set(self.calls.get() + 1);
        fs::create_dir_all(out_dir).expect("create csv dir");
        let path = out_dir.join(SheetName::CompositionalData.file_name());
        fs::write(&path, COMPOSITIONAL).expect("write sheet");
        Ok(vec![path])
    }
}

#[test]
fn missing_sheet_flattens_workbook_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let calls = Rc::new(Cell::new(0));
    let source = SheetSource::new(dir.path()).with_flattener(Box::new(CountingFlattener {
        calls: Rc::clone(&calls),
    }));

    let rows = SheetReader::new(&source, SheetName::CompositionalData)
        .rows()
        .expect("rows after flattening");
    assert_eq!(rows.count(), 3);

    // The flattener did not produce this sheet; it is not run again.
    let err = SheetReader::new(&source, SheetName::DataSource)
        .rows()
        .unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert_eq!(calls.get(), 1);
}

#[test]
fn missing_workbook_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = SheetSource::new(dir.path());
    let err = SheetReader::new(&source, SheetName::SampleMetadata)
        .rows()
        .unwrap_err();
    assert!(matches!(err, IngestError::WorkbookNotFound { .. }));
}
