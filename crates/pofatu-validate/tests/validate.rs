//! Validating datasets built from sheet fixtures.

use std::fs;
use std::path::Path;

use pofatu_core::Dataset;
use pofatu_ingest::{BIBLIOGRAPHY_FILE, SheetName};
use pofatu_standards::Errata;
use pofatu_validate::{CollectingSink, ProblemKind, ValidationInput, validate};

const DATA_SOURCE: &str = "\
Pofatu data source,,,,,,,,,
release,,,,,,,,,
DATASET,,,,,,,,,
Dataset code,Title,Abstract,Authors,Affiliations,Contributors,Contact,Citation key 1,Citation 1,DOI 1
Sinton-1997-Database,Hawaiian adzes,,J. Sinton,,,,Sinton-1997-Database,Sinton 1997,
";

const METHODS: &str = "\
Pofatu methods,,,
release,,,
METHOD,,,
Method code,Parameter,Technique,Instrument
M1,SiO2,XRF,
";

const SAMPLES: &str = "\
Pofatu samples,,,
release,,,
SAMPLE,,,
Sample ID,Sample category,Citation code 1,Citation code 3
S1,SOURCE,Sinton-1997-Database,Sinton-1997-Database
";

const COMPOSITIONAL: &str = "\
Pofatu compositional data,,,,
release,,,,
SAMPLE,METHOD,PARAMETER,SiO2,TiO2
Sample ID,Method code,,wt%,wt%
S1,M1,,45.2,
";

const BIBLIOGRAPHY: &str = "\
@article{Sinton-1997-Database,
  title = {Hawaiian adzes},
  year = 1997
}
";

fn write_sheet(repos: &Path, sheet: SheetName, contents: &str) {
    let dir = repos.join("csv");
    fs::create_dir_all(&dir).expect("create csv dir");
    fs::write(dir.join(sheet.file_name()), contents).expect("write sheet");
}

fn repository() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_sheet(dir.path(), SheetName::DataSource, DATA_SOURCE);
    write_sheet(dir.path(), SheetName::MethodologicalMetadata, METHODS);
    write_sheet(dir.path(), SheetName::SampleMetadata, SAMPLES);
    write_sheet(dir.path(), SheetName::CompositionalData, COMPOSITIONAL);
    dir
}

fn dataset(repos: &Path) -> Dataset {
    Dataset::new(repos).with_errata(Errata::builtin().expect("builtin errata"))
}

#[test]
fn complete_dataset_has_no_problems() {
    let dir = repository();
    fs::write(dir.path().join(BIBLIOGRAPHY_FILE), BIBLIOGRAPHY).expect("write bib");
    let dataset = dataset(dir.path());
    let snapshot = dataset.load().expect("load");
    let bib = dataset.bibliography().expect("bib");

    let mut sink = CollectingSink::new();
    let count = validate(
        &ValidationInput::from_snapshot(&snapshot),
        &bib,
        Some(&mut sink),
    )
    .expect("validate");

    assert_eq!(count, 0, "{:?}", sink.problems());
}

#[test]
fn missing_bibliography_skips_citation_checks() {
    let dir = repository();
    let dataset = dataset(dir.path());
    let snapshot = dataset.load().expect("load");
    let bib = dataset.bibliography().expect("bib");
    assert!(bib.is_empty());

    let count = validate(&ValidationInput::from_snapshot(&snapshot), &bib, None).expect("validate");
    assert_eq!(count, 0);
}

#[test]
fn unresolved_methods_and_citations_are_counted() {
    let dir = repository();
    fs::write(
        dir.path().join(BIBLIOGRAPHY_FILE),
        "@book{Other-2001, title = {Other}}\n",
    )
    .expect("write bib");
    write_sheet(
        dir.path(),
        SheetName::CompositionalData,
        "\
Pofatu compositional data,,,,
release,,,,
SAMPLE,METHOD,PARAMETER,SiO2,TiO2
Sample ID,Method code,,wt%,wt%
S1,M1,,45.2,2.1
",
    );
    let dataset = dataset(dir.path());
    let snapshot = dataset.load().expect("load");
    let bib = dataset.bibliography().expect("bib");

    let mut sink = CollectingSink::new();
    let count = validate(
        &ValidationInput::from_snapshot(&snapshot),
        &bib,
        Some(&mut sink),
    )
    .expect("validate");

    assert_eq!(count, 4);
    assert_eq!(sink.count(ProblemKind::MissingReference), 1);
    assert_eq!(sink.count(ProblemKind::MissingContribution), 1);
    assert_eq!(sink.count(ProblemKind::MissingCitation), 1);
    assert_eq!(sink.count(ProblemKind::MissingMethod), 1);
    let missing_method = sink
        .problems()
        .iter()
        .find(|problem| problem.kind == ProblemKind::MissingMethod)
        .expect("missing method problem");
    insta::assert_snapshot!(missing_method.to_string(), @"missing method (S1-M1): no method M1 for TiO2 [wt%]");
}
