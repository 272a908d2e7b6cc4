//! Validation problems and where they are sent.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Kind of a non-fatal validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ProblemKind {
    /// Reference id absent from the bibliography.
    MissingReference,
    /// Contribution id absent from the bibliography.
    MissingContribution,
    /// Sample, artefact or site citation key absent from the bibliography.
    MissingCitation,
    /// Measurement without a resolved method.
    MissingMethod,
}

impl ProblemKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingReference => "missing reference",
            Self::MissingContribution => "missing contribution",
            Self::MissingCitation => "missing citation",
            Self::MissingMethod => "missing method",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One non-fatal validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub kind: ProblemKind,
    /// Id of the offending entity.
    pub subject: String,
    pub message: String,
}

impl Problem {
    pub fn new(kind: ProblemKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.subject, self.message)
    }
}

/// Receives problems as the validator finds them.
pub trait ProblemSink {
    fn report(&mut self, problem: Problem);
}

/// Logs every problem as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProblemSink for TracingSink {
    fn report(&mut self, problem: Problem) {
        warn!(
            kind = %problem.kind,
            subject = %problem.subject,
            "{}",
            problem.message
        );
    }
}

/// Keeps every problem in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    problems: Vec<Problem>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }

    /// Number of problems of `kind`.
    pub fn count(&self, kind: ProblemKind) -> usize {
        self.problems
            .iter()
            .filter(|problem| problem.kind == kind)
            .count()
    }
}

impl ProblemSink for CollectingSink {
    fn report(&mut self, problem: Problem) {
        self.problems.push(problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_display() {
        let problem = Problem::new(
            ProblemKind::MissingReference,
            "Hunt-1988-JPS",
            "reference not in bibliography",
        );
        assert_eq!(
            problem.to_string(),
            "missing reference (Hunt-1988-JPS): reference not in bibliography"
        );
    }

    #[test]
    fn test_collecting_sink_counts_by_kind() {
        let mut sink = CollectingSink::new();
        sink.report(Problem::new(ProblemKind::MissingMethod, "S1-M1", "x"));
        sink.report(Problem::new(ProblemKind::MissingCitation, "S1", "y"));
        sink.report(Problem::new(ProblemKind::MissingMethod, "S2-M1", "z"));
        assert_eq!(sink.count(ProblemKind::MissingMethod), 2);
        assert_eq!(sink.problems().len(), 3);
    }
}
