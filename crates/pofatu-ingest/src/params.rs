//! Measured parameters of the compositional data sheet.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::reader::SheetHeader;

/// Top-header label of the column after which parameter columns start.
pub const PARAMETER_MARKER: &str = "PARAMETER";

/// One parameter column together with its companion columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterColumn {
    /// `name` or `name [unit]`.
    pub name: String,
    pub column: usize,
    pub precision_column: Option<usize>,
    pub sigma_column: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Companion {
    Precision,
    Sigma,
}

fn companion(name: &str) -> Option<Companion> {
    let name = name.trim().to_ascii_lowercase();
    if name == "sd" || name.ends_with("sd value") {
        Some(Companion::Precision)
    } else if name == "sigma" || name == "\u{3c3}" || name.ends_with("sd sigma") {
        Some(Companion::Sigma)
    } else {
        None
    }
}

/// Parameter columns in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterIndex {
    parameters: Vec<ParameterColumn>,
}

impl ParameterIndex {
    /// Builds the index from the compositional sheet header.
    ///
    /// A second parameter with the same name is an error.
    pub fn build(header: &SheetHeader) -> Result<Self> {
        let Some(marker) = header.top_position(PARAMETER_MARKER) else {
            warn!("no {PARAMETER_MARKER} column in compositional header, no parameters read");
            return Ok(Self::default());
        };

        let mut parameters: Vec<ParameterColumn> = Vec::new();
        for column in marker + 1..header.len() {
            let Some(name) = header.top(column).map(str::trim).filter(|name| !name.is_empty())
            else {
                continue;
            };
            if let Some(kind) = companion(name) {
                let Some(last) = parameters.last_mut() else {
                    warn!(column, name, "companion column before any parameter ignored");
                    continue;
                };
                match kind {
                    Companion::Precision => last.precision_column = Some(column),
                    Companion::Sigma => last.sigma_column = Some(column),
                }
                continue;
            }

            let name = match header.sub(column).map(str::trim).filter(|unit| !unit.is_empty()) {
                Some(unit) => format!("{name} [{unit}]"),
                None => name.to_string(),
            };
            if parameters.iter().any(|parameter| parameter.name == name) {
                return Err(IngestError::DuplicateParameter { parameter: name });
            }
            parameters.push(ParameterColumn {
                name,
                column,
                precision_column: None,
                sigma_column: None,
            });
        }
        debug!(count = parameters.len(), "built parameter index");
        Ok(Self { parameters })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterColumn> {
        self.parameters.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterColumn> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|parameter| parameter.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|value| (!value.is_empty()).then(|| value.to_string()))
            .collect()
    }

    #[test]
    fn test_build_with_companions() {
        let header = SheetHeader::new(
            cells(&["SAMPLE", "METHOD", "PARAMETER", "SiO2", "SiO2 SD value", "SiO2 SD sigma", "87Sr/86Sr", "SD", "Rb"]),
            cells(&["Sample ID", "Method code", "", "wt%", "", "", "", "", "ppm"]),
        );
        let index = ParameterIndex::build(&header).unwrap();
        let names: Vec<&str> = index.names().collect();
        assert_eq!(names, vec!["SiO2 [wt%]", "87Sr/86Sr", "Rb [ppm]"]);

        let sio2 = index.get("SiO2 [wt%]").unwrap();
        assert_eq!(sio2.column, 3);
        assert_eq!(sio2.precision_column, Some(4));
        assert_eq!(sio2.sigma_column, Some(5));
        assert_eq!(index.get("87Sr/86Sr").unwrap().precision_column, Some(7));
        assert_eq!(index.get("Rb [ppm]").unwrap().sigma_column, None);
    }

    #[test]
    fn test_duplicate_parameter() {
        let header = SheetHeader::new(
            cells(&["PARAMETER", "SiO2", "SiO2"]),
            cells(&["", "wt%", "wt%"]),
        );
        let err = ParameterIndex::build(&header).unwrap_err();
        assert!(matches!(err, IngestError::DuplicateParameter { ref parameter } if parameter == "SiO2 [wt%]"));
    }

    #[test]
    fn test_same_name_different_unit_is_distinct() {
        let header = SheetHeader::new(
            cells(&["PARAMETER", "Fe", "Fe"]),
            cells(&["", "wt%", "ppm"]),
        );
        assert_eq!(ParameterIndex::build(&header).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_marker() {
        let header = SheetHeader::new(cells(&["SiO2"]), cells(&["wt%"]));
        assert!(ParameterIndex::build(&header).unwrap().is_empty());
    }
}
