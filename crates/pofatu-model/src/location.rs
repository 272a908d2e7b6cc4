use serde::Serialize;

use pofatu_common::slug;

use crate::error::{ModelError, Result};

/// Where a sample was collected.
///
/// Locations are never stored on their own; each one belongs to a single
/// [`Sample`](crate::Sample).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub loc1: Option<String>,
    pub loc2: Option<String>,
    pub loc3: Option<String>,
    pub comment: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<String>,
}

impl Location {
    /// Checks coordinate ranges, returning the location unchanged.
    pub fn validated(self) -> Result<Self> {
        if let Some(latitude) = self.latitude
            && !(-90.0..=90.0).contains(&latitude)
        {
            return Err(ModelError::CoordinateOutOfRange {
                axis: "latitude",
                value: latitude,
            });
        }
        if let Some(longitude) = self.longitude
            && !(-180.0..=180.0).contains(&longitude)
        {
            return Err(ModelError::CoordinateOutOfRange {
                axis: "longitude",
                value: longitude,
            });
        }
        Ok(self)
    }

    /// Place name hierarchy, e.g. `Marquesas / Nuku Hiva / Hatiheu`.
    pub fn label(&self) -> String {
        join_parts([&self.loc1, &self.loc2, &self.loc3])
    }

    /// Display name: the hierarchy and comment, followed by coordinates when
    /// both are known.
    pub fn name(&self) -> String {
        let mut name = join_parts([&self.loc1, &self.loc2, &self.loc3, &self.comment]);
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            name.push_str(&format!(
                " ({latitude:.4}, {longitude:.4}, {})",
                self.elevation.as_deref().unwrap_or("-")
            ));
        }
        name
    }

    pub fn id(&self) -> String {
        slug(&self.name(), true)
    }
}

fn join_parts<const N: usize>(parts: [&Option<String>; N]) -> String {
    parts
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}
