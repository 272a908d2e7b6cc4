use pofatu_ingest::MergeConflict;
use pofatu_model::{Analysis, Contribution, Method, Reference, Sample};
use serde::Serialize;

use crate::analyses::MergeSummary;

/// Every entity of a repository, built in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSnapshot {
    pub contributions: Vec<Contribution>,
    pub references: Vec<Reference>,
    pub methods: Vec<Method>,
    pub samples: Vec<Sample>,
    pub analyses: Vec<Analysis>,
    /// Conflicts found while merging compositional rows.
    pub conflicts: Vec<MergeConflict>,
    pub merge: MergeSummary,
}

/// Entity counts of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotCounts {
    pub contributions: usize,
    pub references: usize,
    pub methods: usize,
    pub method_references: usize,
    pub samples: usize,
    pub analyses: usize,
    pub measurements: usize,
    pub conflicts: usize,
}

impl DatasetSnapshot {
    pub fn counts(&self) -> SnapshotCounts {
        SnapshotCounts {
            contributions: self.contributions.len(),
            references: self.references.len(),
            methods: self.methods.len(),
            method_references: self
                .methods
                .iter()
                .map(|method| method.references.len())
                .sum(),
            samples: self.samples.len(),
            analyses: self.analyses.len(),
            measurements: self
                .analyses
                .iter()
                .map(|analysis| analysis.measurements.len())
                .sum(),
            conflicts: self.conflicts.len(),
        }
    }

    /// Number of measurements per parameter, in parameter name order.
    pub fn parameter_counts(&self) -> std::collections::BTreeMap<&str, usize> {
        let mut counts = std::collections::BTreeMap::new();
        for measurement in self.analyses.iter().flat_map(|analysis| &analysis.measurements) {
            *counts.entry(measurement.parameter.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
