//! Entry point for building the entity graph of one repository.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pofatu_ingest::{
    ParameterIndex, SheetName, SheetReader, SheetSource, WorkbookFlattener, group_rows,
    merge_group,
};
use pofatu_model::{Contribution, Method, Reference, Sample};
use pofatu_standards::{BibliographyIndex, Errata};
use tracing::{debug, info, info_span};

use crate::analyses::{
    AnalysisIter, CompositionalGroup, MergeSummary, collect_conflicts, compositional_key,
    normalize_sample_id,
};
use crate::error::Result;
use crate::methods::{build_method, method_key};
use crate::options::BuildOptions;
use crate::samples::SampleCollector;
use crate::snapshot::DatasetSnapshot;
use crate::sources::{ReferenceCollector, build_contribution, contribution_key, normalize_code};

/// A Pofatu data repository: the workbook (or its flattened sheets) and
/// the bibliography.
///
/// Every operation reads its sheet afresh. Only the parameter index of the
/// compositional sheet is cached.
#[derive(Debug)]
pub struct Dataset {
    source: SheetSource,
    errata: Errata,
    options: BuildOptions,
    parameters: OnceCell<ParameterIndex>,
}

impl Dataset {
    /// Opens a repository with empty errata and default options.
    pub fn new(repos: impl Into<PathBuf>) -> Self {
        Self {
            source: SheetSource::new(repos),
            errata: Errata::default(),
            options: BuildOptions::default(),
            parameters: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn with_errata(mut self, errata: Errata) -> Self {
        self.errata = errata;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_flattener(mut self, flattener: Box<dyn WorkbookFlattener>) -> Self {
        self.source = self.source.with_flattener(flattener);
        self
    }

    pub fn repos(&self) -> &Path {
        self.source.repos()
    }

    pub fn errata(&self) -> &Errata {
        &self.errata
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    pub fn reader(&self, sheet: SheetName) -> SheetReader<'_> {
        SheetReader::new(&self.source, sheet)
    }

    /// Parameter columns of the compositional sheet, read once.
    pub fn parameters(&self) -> Result<&ParameterIndex> {
        if let Some(index) = self.parameters.get() {
            return Ok(index);
        }
        let header = self.reader(SheetName::CompositionalData).header()?;
        let index = ParameterIndex::build(&header)?;
        Ok(self.parameters.get_or_init(|| index))
    }

    /// Bibliography at its default location in the repository.
    pub fn bibliography(&self) -> Result<BibliographyIndex> {
        Ok(BibliographyIndex::load(
            &self.source.bibliography_path(),
            &self.errata,
        )?)
    }

    pub fn contributions(&self) -> Result<Vec<Contribution>> {
        let _span = info_span!("contributions").entered();
        let rows = self
            .reader(SheetName::DataSource)
            .rows()?
            .map(|row| row.map(|row| normalize_code(row, &self.errata)));
        let contributions: Vec<Contribution> = group_rows(rows, &contribution_key())?
            .iter()
            .filter_map(|group| build_contribution(group, &self.errata))
            .collect();
        debug!(count = contributions.len(), "built contributions");
        Ok(contributions)
    }

    pub fn references(&self) -> Result<Vec<Reference>> {
        let _span = info_span!("references").entered();
        let mut collector = ReferenceCollector::default();
        for row in self.reader(SheetName::DataSource).rows()? {
            collector.add_row(&row?, &self.errata);
        }
        let references = collector.finish();
        debug!(count = references.len(), "built references");
        Ok(references)
    }

    /// Methods in `(code, parameter)` order.
    pub fn methods(&self) -> Result<Vec<Method>> {
        let _span = info_span!("methods").entered();
        let rows = self.reader(SheetName::MethodologicalMetadata).rows()?;
        let methods: Vec<Method> = group_rows(rows, &method_key())?
            .iter()
            .filter_map(build_method)
            .collect();
        debug!(count = methods.len(), "built methods");
        Ok(methods)
    }

    /// Samples in sheet order.
    pub fn samples(&self) -> Result<Vec<Sample>> {
        let _span = info_span!("samples").entered();
        let rows = self.reader(SheetName::SampleMetadata).rows()?;
        SampleCollector::check_header(&rows.header())?;
        let mut collector = SampleCollector::new(&self.errata, self.options);
        for row in rows {
            collector.add_row(row?)?;
        }
        let samples = collector.finish();
        debug!(count = samples.len(), "built samples");
        Ok(samples)
    }

    /// Compositional rows grouped by sample id and method code, each group
    /// merged into one row.
    pub fn compositional_groups(&self) -> Result<Vec<CompositionalGroup>> {
        let _span = info_span!("compositional").entered();
        let rows = self
            .reader(SheetName::CompositionalData)
            .rows()?
            .map(|row| row.map(|row| normalize_sample_id(row, &self.errata)));
        let groups: Vec<CompositionalGroup> = group_rows(rows, &compositional_key())?
            .into_iter()
            .filter_map(merge_group)
            .filter_map(CompositionalGroup::from_outcome)
            .collect();
        debug!(count = groups.len(), "merged compositional rows");
        Ok(groups)
    }

    /// Lazily builds the analyses of `samples`.
    pub fn analyses<'a>(
        &'a self,
        samples: &'a [Sample],
        methods: &[Method],
    ) -> Result<AnalysisIter<'a>> {
        let groups = self.compositional_groups()?;
        self.analyses_from(samples, methods, groups)
    }

    pub(crate) fn analyses_from<'a>(
        &'a self,
        samples: &'a [Sample],
        methods: &[Method],
        groups: Vec<CompositionalGroup>,
    ) -> Result<AnalysisIter<'a>> {
        Ok(AnalysisIter::new(
            samples,
            methods,
            self.parameters()?,
            groups,
        ))
    }

    /// Terms listed in the vocabularies sheet, by column title.
    pub fn sheet_vocabularies(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let rows = self.reader(SheetName::Vocabularies).rows()?;
        let header = rows.header();
        let titles: Vec<(usize, String)> = (0..header.len())
            .filter_map(|column| {
                header
                    .top(column)
                    .or_else(|| header.sub(column))
                    .map(|title| (column, title.trim().to_string()))
            })
            .collect();

        let mut vocabularies: BTreeMap<String, Vec<String>> = titles
            .iter()
            .map(|(_, title)| (title.clone(), Vec::new()))
            .collect();
        for row in rows {
            let row = row?;
            for (column, title) in &titles {
                if let Some(term) = row.get(*column)
                    && let Some(terms) = vocabularies.get_mut(title)
                    && !terms.iter().any(|known| known == term)
                {
                    terms.push(term.to_string());
                }
            }
        }
        Ok(vocabularies)
    }

    /// Builds every entity into memory.
    pub fn load(&self) -> Result<DatasetSnapshot> {
        let _span = info_span!("load", repos = %self.repos().display()).entered();
        let contributions = self.contributions()?;
        let references = self.references()?;
        let methods = self.methods()?;
        let samples = self.samples()?;
        let groups = self.compositional_groups()?;
        let conflicts = collect_conflicts(&groups);
        let merge = MergeSummary::of(&groups);
        let analyses = self
            .analyses_from(&samples, &methods, groups)?
            .collect::<Result<Vec<_>>>()?;
        info!(
            contributions = contributions.len(),
            references = references.len(),
            methods = methods.len(),
            samples = samples.len(),
            analyses = analyses.len(),
            conflicts = conflicts.len(),
            "dataset loaded"
        );
        Ok(DatasetSnapshot {
            contributions,
            references,
            methods,
            samples,
            analyses,
            conflicts,
            merge,
        })
    }
}
