use serde::Serialize;

use pofatu_common::slug;

use crate::location::Location;
use crate::vocabulary::{SampleCategory, Term};

/// The artefact a sample was taken from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artefact {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Term,
    pub attributes: Term,
    pub comment: Option<String>,
    pub source_ids: Vec<String>,
    pub collection_type: Term,
    pub collector: Option<String>,
    pub collection_comment: Option<String>,
}

/// The archaeological site a sample comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub name: Option<String>,
    pub code: Option<String>,
    pub context: Term,
    pub comment: Option<String>,
    pub stratigraphic_position: Option<String>,
    pub stratigraphy_comment: Option<String>,
    pub source_ids: Vec<String>,
}

impl Site {
    /// Case-preserving slug of source ids, name and code.
    pub fn id(&self) -> String {
        let mut raw = self.source_ids.concat();
        raw.push_str(self.name.as_deref().unwrap_or_default());
        raw.push_str(self.code.as_deref().unwrap_or_default());
        slug(&raw, false)
    }
}

/// A sample row from the sample metadata sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub id: String,
    pub name: Option<String>,
    pub category: Option<SampleCategory>,
    pub comment: Option<String>,
    pub petrography: Option<String>,
    pub source_id: Option<String>,
    pub analyzed_material_1: Term,
    pub analyzed_material_2: Term,
    pub location: Location,
    pub artefact: Artefact,
    pub site: Site,
}

impl Sample {
    /// Every citation key the sample row refers to, in sheet order.
    pub fn citation_keys(&self) -> impl Iterator<Item = &str> {
        self.source_id
            .iter()
            .chain(self.artefact.source_ids.iter())
            .chain(self.site.source_ids.iter())
            .map(String::as_str)
    }
}
