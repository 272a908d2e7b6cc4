//! Analyses and measurements from the compositional data sheet.

use std::collections::BTreeMap;

use pofatu_common::{RawValue, parse_sigma, parse_value};
use pofatu_ingest::{
    GroupKey, MergeConflict, MergeOutcome, ParameterColumn, ParameterIndex, SheetName, SheetRow,
};
use pofatu_model::{
    Analysis, AnalysisRegistry, Measurement, Method, MethodKey, ModelError, Sample,
    parameter_head_word,
};
use pofatu_standards::Errata;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{BuildError, Result};
use crate::fields::is_placeholder;

pub(crate) const SAMPLE_ID: usize = 0;
pub(crate) const METHOD_CODE: usize = 1;

pub(crate) fn compositional_key() -> GroupKey {
    GroupKey::new([SAMPLE_ID, METHOD_CODE])
}

/// Rewrites the sample id cell through the errata before grouping.
pub(crate) fn normalize_sample_id(mut row: SheetRow, errata: &Errata) -> SheetRow {
    if let Some(id) = row.get(SAMPLE_ID).map(|id| errata.sample_id(id)) {
        row.set(SAMPLE_ID, Some(id));
    }
    row
}

/// The merged compositional rows of one sample and method.
#[derive(Debug, Clone)]
pub struct CompositionalGroup {
    pub sample_id: String,
    pub method_code: String,
    pub row: SheetRow,
    pub conflicts: Vec<MergeConflict>,
    /// Physical rows merged into `row`.
    pub source_rows: Vec<usize>,
}

impl CompositionalGroup {
    pub(crate) fn from_outcome(outcome: MergeOutcome) -> Option<Self> {
        let row = outcome.row;
        let sample_id = row.get(SAMPLE_ID);
        if is_placeholder(sample_id) {
            debug!(row = row.index, "compositional row without sample id skipped");
            return None;
        }
        let Some(method_code) = row.text(METHOD_CODE) else {
            warn!(
                sample = sample_id.unwrap_or_default(),
                row = row.index,
                "compositional row without method code skipped"
            );
            return None;
        };
        Some(Self {
            sample_id: sample_id.unwrap_or_default().to_string(),
            method_code,
            conflicts: outcome.conflicts,
            source_rows: outcome.source_rows,
            row,
        })
    }
}

/// Lazily builds one [`Analysis`] per compositional group, walking samples
/// in order.
///
/// Yields an error for malformed cells, invalid sigma levels and duplicate
/// ids. Iteration may continue after an error.
#[derive(Debug)]
pub struct AnalysisIter<'a> {
    samples: std::slice::Iter<'a, Sample>,
    groups: BTreeMap<String, Vec<CompositionalGroup>>,
    pending: std::vec::IntoIter<CompositionalGroup>,
    parameters: &'a ParameterIndex,
    methods: BTreeMap<MethodKey, String>,
    registry: AnalysisRegistry,
}

impl<'a> AnalysisIter<'a> {
    /// Groups whose sample id matches no sample are logged and dropped.
    pub fn new(
        samples: &'a [Sample],
        methods: &[Method],
        parameters: &'a ParameterIndex,
        compositional: Vec<CompositionalGroup>,
    ) -> Self {
        let mut groups: BTreeMap<String, Vec<CompositionalGroup>> = BTreeMap::new();
        for group in compositional {
            groups.entry(group.sample_id.clone()).or_default().push(group);
        }
        let known: std::collections::BTreeSet<&str> =
            samples.iter().map(|sample| sample.id.as_str()).collect();
        groups.retain(|sample_id, orphans| {
            if known.contains(sample_id.as_str()) {
                return true;
            }
            for orphan in orphans.iter() {
                warn!(
                    sample = %sample_id,
                    method = %orphan.method_code,
                    row = orphan.row.index,
                    "compositional data for unknown sample ignored"
                );
            }
            false
        });

        Self {
            samples: samples.iter(),
            groups,
            pending: Vec::new().into_iter(),
            parameters,
            methods: methods
                .iter()
                .map(|method| (method.key(), method.id()))
                .collect(),
            registry: AnalysisRegistry::new(),
        }
    }

    /// Number of analyses handed out so far.
    pub fn registered(&self) -> usize {
        self.registry.len()
    }

    fn build(&mut self, group: &CompositionalGroup) -> Result<Analysis> {
        let mut analysis = Analysis::new(&group.sample_id, &group.method_code);
        self.registry.register(&analysis)?;
        let parameters = self.parameters;
        for parameter in parameters.iter() {
            if let Some(measurement) = self.measurement(group, parameter)? {
                analysis.add_measurement(measurement)?;
            }
        }
        Ok(analysis)
    }

    fn measurement(
        &self,
        group: &CompositionalGroup,
        parameter: &ParameterColumn,
    ) -> Result<Option<Measurement>> {
        let row = &group.row;
        let invalid = |column: usize, source: ModelError| BuildError::InvalidCell {
            sheet: SheetName::CompositionalData,
            row: row.index,
            column: row
                .header
                .column_name(column)
                .map_or_else(|| parameter.name.clone(), str::to_string),
            source,
        };

        let parsed = parse_value(RawValue::from(row.get(parameter.column)))
            .map_err(|e| invalid(parameter.column, e.into()))?;
        let Some(value) = parsed.value else {
            return Ok(None);
        };

        let precision = match (parsed.precision, parameter.precision_column) {
            (Some(precision), _) => Some(precision),
            (None, Some(column)) => {
                parse_value(RawValue::from(row.get(column)))
                    .map_err(|e| invalid(column, e.into()))?
                    .value
            }
            (None, None) => None,
        };
        let sigma_cell = parameter
            .sigma_column
            .and_then(|column| row.get(column).map(|cell| (column, cell)));
        let sigma = match sigma_cell {
            Some((column, cell)) => parse_sigma(cell).map_err(|e| invalid(column, e.into()))?,
            None => None,
        };

        let method_id = self
            .methods
            .get(&MethodKey::new(
                &group.method_code,
                parameter_head_word(&parameter.name),
            ))
            .cloned();

        Measurement::new(&parameter.name, value)
            .with_less(parsed.less)
            .with_precision(precision)
            .with_sigma(sigma)
            .map(|measurement| Some(measurement.with_method(method_id)))
            .map_err(|e| invalid(parameter.sigma_column.unwrap_or(parameter.column), e))
    }
}

impl Iterator for AnalysisIter<'_> {
    type Item = Result<Analysis>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(group) = self.pending.next() {
                return Some(self.build(&group));
            }
            let sample = self.samples.next()?;
            if let Some(groups) = self.groups.remove(&sample.id) {
                self.pending = groups.into_iter();
            }
        }
    }
}

/// Merge conflicts of every group, in group order.
pub fn collect_conflicts(groups: &[CompositionalGroup]) -> Vec<MergeConflict> {
    groups
        .iter()
        .flat_map(|group| group.conflicts.iter().cloned())
        .collect()
}

/// Counts describing how compositional rows were merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub groups: usize,
    pub merged_rows: usize,
    pub conflicts: usize,
}

impl MergeSummary {
    pub fn of(groups: &[CompositionalGroup]) -> Self {
        Self {
            groups: groups.len(),
            merged_rows: groups.iter().map(|group| group.source_rows.len()).sum(),
            conflicts: groups.iter().map(|group| group.conflicts.len()).sum(),
        }
    }
}
