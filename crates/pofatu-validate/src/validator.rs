//! Cross-reference checks over built entities.

use std::collections::BTreeSet;

use pofatu_core::DatasetSnapshot;
use pofatu_model::{Analysis, Contribution, Reference, Sample};
use pofatu_standards::BibliographyIndex;
use tracing::{debug, info, info_span};

use crate::error::{Result, ValidationError};
use crate::problem::{Problem, ProblemKind, ProblemSink};

/// The entities a validation pass looks at.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub references: &'a [Reference],
    pub contributions: &'a [Contribution],
    pub samples: &'a [Sample],
    pub analyses: &'a [Analysis],
}

impl<'a> ValidationInput<'a> {
    pub fn from_snapshot(snapshot: &'a DatasetSnapshot) -> Self {
        Self {
            references: &snapshot.references,
            contributions: &snapshot.contributions,
            samples: &snapshot.samples,
            analyses: &snapshot.analyses,
        }
    }
}

/// Sends problems to the sink, or raises the first one when there is none.
struct Reporter<'s> {
    sink: Option<&'s mut dyn ProblemSink>,
    count: usize,
}

impl Reporter<'_> {
    fn report(&mut self, problem: Problem) -> Result<()> {
        match self.sink.as_deref_mut() {
            Some(sink) => {
                sink.report(problem);
                self.count += 1;
                Ok(())
            }
            None => Err(ValidationError::Problem(problem)),
        }
    }
}

/// Checks the entities against each other and against the bibliography.
///
/// Duplicate analysis ids and duplicate measurements always fail, and are
/// checked before anything else. Bibliography checks are skipped when `bib`
/// is empty. Other problems go to `sink` and are counted; without a sink the
/// first one is returned as [`ValidationError::Problem`].
///
/// Returns the number of problems reported.
pub fn validate(
    input: &ValidationInput<'_>,
    bib: &BibliographyIndex,
    sink: Option<&mut dyn ProblemSink>,
) -> Result<usize> {
    let _span = info_span!("validate").entered();
    check_duplicates(input.analyses)?;

    let mut reporter = Reporter { sink, count: 0 };
    if bib.is_empty() {
        debug!("empty bibliography, citation checks skipped");
    } else {
        check_references(input.references, bib, &mut reporter)?;
        check_contributions(input.contributions, bib, &mut reporter)?;
        check_sample_citations(input.samples, bib, &mut reporter)?;
    }
    check_methods(input.analyses, &mut reporter)?;

    info!(problems = reporter.count, "validation finished");
    Ok(reporter.count)
}

fn check_references(
    references: &[Reference],
    bib: &BibliographyIndex,
    reporter: &mut Reporter<'_>,
) -> Result<()> {
    for reference in references.iter().filter(|r| !bib.contains(&r.id)) {
        reporter.report(Problem::new(
            ProblemKind::MissingReference,
            &reference.id,
            "reference not in bibliography",
        ))?;
    }
    Ok(())
}

fn check_contributions(
    contributions: &[Contribution],
    bib: &BibliographyIndex,
    reporter: &mut Reporter<'_>,
) -> Result<()> {
    for contribution in contributions.iter().filter(|c| !bib.contains(&c.id)) {
        reporter.report(Problem::new(
            ProblemKind::MissingContribution,
            &contribution.id,
            "contribution not in bibliography",
        ))?;
    }
    Ok(())
}

fn check_sample_citations(
    samples: &[Sample],
    bib: &BibliographyIndex,
    reporter: &mut Reporter<'_>,
) -> Result<()> {
    for sample in samples {
        let missing: BTreeSet<&str> = sample
            .citation_keys()
            .filter(|key| !bib.contains(key))
            .collect();
        for key in missing {
            reporter.report(Problem::new(
                ProblemKind::MissingCitation,
                &sample.id,
                format!("citation key {key} not in bibliography"),
            ))?;
        }
    }
    Ok(())
}

fn check_duplicates(analyses: &[Analysis]) -> Result<()> {
    let mut ids = BTreeSet::new();
    for analysis in analyses {
        if !ids.insert(analysis.id.as_str()) {
            return Err(ValidationError::DuplicateAnalysis {
                id: analysis.id.clone(),
            });
        }
        let mut parameters = BTreeSet::new();
        for measurement in &analysis.measurements {
            if !parameters.insert(measurement.parameter.as_str()) {
                return Err(ValidationError::DuplicateMeasurement {
                    analysis: analysis.id.clone(),
                    parameter: measurement.parameter.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_methods(analyses: &[Analysis], reporter: &mut Reporter<'_>) -> Result<()> {
    for analysis in analyses {
        for measurement in analysis.measurements.iter().filter(|m| m.method_id.is_none()) {
            reporter.report(Problem::new(
                ProblemKind::MissingMethod,
                &analysis.id,
                format!(
                    "no method {} for {}",
                    analysis.method_id, measurement.parameter
                ),
            ))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pofatu_model::Measurement;
    use pofatu_standards::BibRecord;

    use super::*;

    fn bib(ids: &[&str]) -> BibliographyIndex {
        BibliographyIndex::from_records(ids.iter().map(|id| BibRecord {
            id: id.to_string(),
            key: id.to_string(),
            entry_type: "article".to_string(),
            fields: BTreeMap::new(),
        }))
    }

    fn reference(id: &str) -> Reference {
        Reference {
            id: id.to_string(),
            citation: None,
            doi: None,
        }
    }

    fn analysis(sample: &str, parameters: &[(&str, Option<&str>)]) -> Analysis {
        let mut analysis = Analysis::new(sample, "M1");
        for (parameter, method) in parameters {
            analysis
                .add_measurement(
                    Measurement::new(*parameter, 1.0).with_method(method.map(str::to_string)),
                )
                .unwrap();
        }
        analysis
    }

    fn input<'a>(references: &'a [Reference], analyses: &'a [Analysis]) -> ValidationInput<'a> {
        ValidationInput {
            references,
            contributions: &[],
            samples: &[],
            analyses,
        }
    }

    #[test]
    fn test_empty_bibliography_skips_citation_checks() {
        let references = [reference("Unknown-2000")];
        let count = validate(&input(&references, &[]), &BibliographyIndex::empty(), None).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_first_problem_raised_without_sink() {
        let references = [reference("A-2000"), reference("B-2001")];
        let err = validate(&input(&references, &[]), &bib(&["A-2000"]), None).unwrap_err();
        match err {
            ValidationError::Problem(problem) => {
                assert_eq!(problem.kind, ProblemKind::MissingReference);
                assert_eq!(problem.subject, "B-2001");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sink_counts_every_problem() {
        let references = [reference("A-2000"), reference("B-2001")];
        let analyses = [analysis("S1", &[("SiO2 [wt%]", None), ("Al2O3 [wt%]", Some("m1_al2o3"))])];
        let mut sink = crate::CollectingSink::new();
        let count = validate(&input(&references, &analyses), &bib(&["Z-1999"]), Some(&mut sink)).unwrap();
        assert_eq!(count, 3);
        assert_eq!(sink.count(ProblemKind::MissingReference), 2);
        assert_eq!(sink.count(ProblemKind::MissingMethod), 1);
    }

    #[test]
    fn test_duplicate_analysis_is_fatal_with_sink() {
        let analyses = [analysis("S1", &[]), analysis("S1", &[])];
        let mut sink = crate::CollectingSink::new();
        let err = validate(&input(&[], &analyses), &bib(&[]), Some(&mut sink)).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateAnalysis { ref id } if id == "S1-M1"));
    }

    #[test]
    fn test_duplicate_analysis_wins_over_earlier_problems_without_sink() {
        let references = [reference("Missing-1999")];
        let analyses = [
            analysis("S1", &[("SiO2 [wt%]", None)]),
            analysis("S1", &[]),
        ];
        let err = validate(&input(&references, &analyses), &bib(&["A-2000"]), None).unwrap_err();
        assert!(
            matches!(err, ValidationError::DuplicateAnalysis { ref id } if id == "S1-M1"),
            "{err}"
        );
    }

    #[test]
    fn test_duplicate_measurement_is_fatal() {
        let mut duplicated = analysis("S1", &[("SiO2", Some("m"))]);
        duplicated.measurements.push(Measurement::new("SiO2", 2.0));
        let err = validate(&input(&[], &[duplicated]), &bib(&[]), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate measurement of SiO2 in analysis S1-M1"
        );
    }
}
