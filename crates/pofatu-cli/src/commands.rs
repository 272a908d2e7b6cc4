use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use pofatu_core::{BuildOptions, Dataset, DatasetSnapshot, MergeSummary, SnapshotCounts};
use pofatu_ingest::{SheetSource, WorkbookFlattener, XlsxFlattener};
use pofatu_standards::{BibliographyIndex, Errata};
use pofatu_validate::{
    CollectingSink, Problem, ProblemSink, TracingSink, ValidationInput, VocabularyDrift, validate,
    vocabulary_drift,
};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::cli::{CheckArgs, DumpArgs, EntityArg, SourceArgs};

/// Opens the repository with the errata and options the flags ask for.
pub fn open_dataset(args: &SourceArgs) -> Result<Dataset> {
    let errata = match &args.errata {
        Some(path) => {
            Errata::load(path).with_context(|| format!("load errata {}", path.display()))?
        }
        None => Errata::builtin().context("load built-in errata")?,
    };
    let options = if args.strict {
        BuildOptions::strict()
    } else {
        BuildOptions::default()
    };
    Ok(Dataset::new(args.repos.clone())
        .with_errata(errata)
        .with_options(options))
}

pub fn run_dump(dataset: &Dataset, args: &DumpArgs, out: &mut impl Write) -> Result<()> {
    let snapshot = dataset.load().context("build dataset")?;
    match args.entity {
        EntityArg::All => write_json(out, &snapshot, args.compact)?,
        EntityArg::Contributions => write_json(out, &snapshot.contributions, args.compact)?,
        EntityArg::References => write_json(out, &snapshot.references, args.compact)?,
        EntityArg::Methods => write_json(out, &snapshot.methods, args.compact)?,
        EntityArg::Samples => write_json(out, &snapshot.samples, args.compact)?,
        EntityArg::Analyses => write_json(out, &snapshot.analyses, args.compact)?,
        EntityArg::Measurements => write_measurements(out, &snapshot)?,
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_measurements(out: &mut impl Write, snapshot: &DatasetSnapshot) -> Result<()> {
    for analysis in &snapshot.analyses {
        for measurement in &analysis.measurements {
            writeln!(
                out,
                "{}\t{}\t{}\t{}",
                analysis.id,
                measurement.parameter,
                measurement,
                measurement.method_id.as_deref().unwrap_or("-")
            )?;
        }
    }
    Ok(())
}

/// Outcome of `check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub problems: Vec<Problem>,
    pub drift: Vec<VocabularyDrift>,
    pub merge: MergeSummary,
    /// Whether the bibliography had any records.
    pub bibliography_checked: bool,
}

impl CheckReport {
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}

/// Logs each problem and keeps it for the summary.
#[derive(Default)]
struct ReportSink {
    log: TracingSink,
    collected: CollectingSink,
}

impl ProblemSink for ReportSink {
    fn report(&mut self, problem: Problem) {
        self.log.report(problem.clone());
        self.collected.report(problem);
    }
}

pub fn run_check(dataset: &Dataset, args: &CheckArgs) -> Result<CheckReport> {
    let _span = info_span!("check", repos = %dataset.repos().display()).entered();
    let snapshot = dataset.load().context("build dataset")?;
    let bib = load_bibliography(dataset, args.bib.as_ref())?;
    let input = ValidationInput::from_snapshot(&snapshot);

    let problems = if args.fail_fast {
        validate(&input, &bib, None).context("validation failed")?;
        Vec::new()
    } else {
        let mut sink = ReportSink::default();
        let count = validate(&input, &bib, Some(&mut sink)).context("validation failed")?;
        info!(problems = count, "check finished");
        sink.collected.into_problems()
    };

    let drift = match dataset.sheet_vocabularies() {
        Ok(sheet) => vocabulary_drift(&sheet),
        Err(error) => {
            warn!(%error, "vocabularies sheet not compared");
            Vec::new()
        }
    };

    Ok(CheckReport {
        problems,
        drift,
        merge: snapshot.merge,
        bibliography_checked: !bib.is_empty(),
    })
}

fn load_bibliography(dataset: &Dataset, path: Option<&PathBuf>) -> Result<BibliographyIndex> {
    match path {
        Some(path) => BibliographyIndex::load(path, dataset.errata())
            .with_context(|| format!("load bibliography {}", path.display())),
        None => dataset.bibliography().context("load bibliography"),
    }
}

/// Outcome of `stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub counts: SnapshotCounts,
    pub merge: MergeSummary,
    /// Measurements per parameter.
    pub parameters: BTreeMap<String, usize>,
}

pub fn run_stats(dataset: &Dataset) -> Result<StatsReport> {
    let snapshot = dataset.load().context("build dataset")?;
    let parameters = snapshot
        .parameter_counts()
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    Ok(StatsReport {
        counts: snapshot.counts(),
        merge: snapshot.merge.clone(),
        parameters,
    })
}

/// Flattens the repository workbook, replacing existing CSV files.
pub fn run_flatten(args: &SourceArgs) -> Result<Vec<PathBuf>> {
    let source = SheetSource::new(args.repos.clone());
    let workbook = source.workbook_path();
    XlsxFlattener
        .flatten(&workbook, &source.csv_dir())
        .with_context(|| format!("flatten {}", workbook.display()))
}
