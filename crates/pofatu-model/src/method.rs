use std::fmt;

use serde::Serialize;

use pofatu_common::slug;

/// Key of a method: the method code together with the measured parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MethodKey {
    pub code: String,
    pub parameter: String,
}

impl MethodKey {
    pub fn new(code: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            parameter: parameter.into(),
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.parameter)
    }
}

/// A calibration or reference-material record attached to a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodReference {
    pub sample_name: Option<String>,
    pub sample_measured_value: Option<String>,
    pub uncertainty: Option<String>,
    pub uncertainty_unit: Option<String>,
    pub number_of_measurements: Option<String>,
}

impl MethodReference {
    pub fn is_empty(&self) -> bool {
        self == &MethodReference::default()
    }
}

/// An analytical technique, instrument and laboratory used for one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub code: String,
    pub parameter: String,
    pub technique: Option<String>,
    pub instrument: Option<String>,
    pub laboratory: Option<String>,
    pub analyst: Option<String>,
    pub date: Option<String>,
    pub comment: Option<String>,
    pub detection_limit: Option<String>,
    pub detection_limit_unit: Option<String>,
    pub total_procedural_blank: Option<String>,
    pub total_procedural_blank_unit: Option<String>,
    pub references: Vec<MethodReference>,
}

impl Method {
    pub fn key(&self) -> MethodKey {
        MethodKey::new(&self.code, &self.parameter)
    }

    pub fn id(&self) -> String {
        format!(
            "{}_{}",
            slug(&self.code, true),
            slug(&self.parameter, true)
        )
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.code, self.parameter)
    }
}

/// First word of a parameter name: `SiO2 [wt%]` → `SiO2`.
pub fn parameter_head_word(parameter: &str) -> &str {
    parameter.split_whitespace().next().unwrap_or_default()
}
