use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use pofatu_common::format_decimal;

use crate::error::{ModelError, Result};

/// One parameter's value within an analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub parameter: String,
    pub value: f64,
    /// The value is an upper bound (`<` / `≤` in the sheet).
    pub less: bool,
    /// Standard deviation.
    pub precision: Option<f64>,
    /// Sigma level of the precision, 1 or 2.
    pub sigma: Option<u8>,
    /// Id of the method used, when it could be resolved.
    pub method_id: Option<String>,
}

impl Measurement {
    pub fn new(parameter: impl Into<String>, value: f64) -> Self {
        Self {
            parameter: parameter.into(),
            value,
            less: false,
            precision: None,
            sigma: None,
            method_id: None,
        }
    }

    #[must_use]
    pub fn with_less(mut self, less: bool) -> Self {
        self.less = less;
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: Option<f64>) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_sigma(mut self, sigma: Option<u8>) -> Result<Self> {
        if let Some(level) = sigma
            && !matches!(level, 1 | 2)
        {
            return Err(ModelError::InvalidSigma { value: level });
        }
        self.sigma = sigma;
        Ok(self)
    }

    #[must_use]
    pub fn with_method(mut self, method_id: Option<String>) -> Self {
        self.method_id = method_id;
        self
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.less {
            f.write_str("\u{2264}")?;
        }
        f.write_str(&format_decimal(self.value))?;
        if let Some(precision) = self.precision.filter(|precision| *precision != 0.0) {
            write!(f, "\u{b1}{}", format_decimal(precision))?;
        }
        if let Some(sigma) = self.sigma {
            write!(f, "{sigma}\u{3c3}")?;
        }
        Ok(())
    }
}

/// One measurement session: a method applied to a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub id: String,
    pub sample_id: String,
    pub method_id: String,
    pub measurements: Vec<Measurement>,
}

impl Analysis {
    pub fn new(sample_id: impl Into<String>, method_id: impl Into<String>) -> Self {
        let sample_id = sample_id.into();
        let method_id = method_id.into();
        Self {
            id: format!("{sample_id}-{method_id}"),
            sample_id,
            method_id,
            measurements: Vec::new(),
        }
    }

    /// Appends a measurement, rejecting a second value for the same parameter.
    pub fn add_measurement(&mut self, measurement: Measurement) -> Result<()> {
        if self.measurement(&measurement.parameter).is_some() {
            return Err(ModelError::DuplicateMeasurement {
                analysis: self.id.clone(),
                parameter: measurement.parameter,
            });
        }
        self.measurements.push(measurement);
        Ok(())
    }

    pub fn measurement(&self, parameter: &str) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|measurement| measurement.parameter == parameter)
    }
}

/// Tracks analysis ids handed out during one ingestion pass.
#[derive(Debug, Default)]
pub struct AnalysisRegistry {
    ids: BTreeSet<String>,
}

impl AnalysisRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, analysis: &Analysis) -> Result<()> {
        if !self.ids.insert(analysis.id.clone()) {
            return Err(ModelError::DuplicateAnalysis {
                id: analysis.id.clone(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_display() {
        let measurement = Measurement::new("P", 4.5)
            .with_precision(Some(1.0))
            .with_sigma(Some(2))
            .unwrap();
        assert_eq!(measurement.to_string(), "4.5\u{b1}1.02\u{3c3}");

        let measurement = Measurement::new("P", 0.3).with_less(true);
        assert_eq!(measurement.to_string(), "\u{2264}0.3");
    }

    #[test]
    fn test_invalid_sigma() {
        let err = Measurement::new("P", 1.0).with_sigma(Some(3)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidSigma { value: 3 }));
    }

    #[test]
    fn test_duplicate_measurement_rejected() {
        let mut analysis = Analysis::new("S1", "Sinton-1997-Database_A");
        assert_eq!(analysis.id, "S1-Sinton-1997-Database_A");
        analysis
            .add_measurement(Measurement::new("SiO2 [wt%]", 45.2))
            .unwrap();
        let err = analysis
            .add_measurement(Measurement::new("SiO2 [wt%]", 47.0))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateMeasurement { .. }));
        assert_eq!(analysis.measurements.len(), 1);
    }

    #[test]
    fn test_duplicate_analysis_rejected() {
        let mut registry = AnalysisRegistry::new();
        registry.register(&Analysis::new("S1", "M_A")).unwrap();
        registry.register(&Analysis::new("S2", "M_A")).unwrap();
        let err = registry.register(&Analysis::new("S1", "M_A")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateAnalysis { ref id } if id == "S1-M_A"));
        assert_eq!(registry.len(), 2);
    }
}
