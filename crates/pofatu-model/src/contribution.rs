use serde::Serialize;

/// A dataset contributed to the compilation, identified by its citation key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contribution {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub authors: Option<String>,
    pub affiliations: Option<String>,
    pub contributors: Vec<String>,
    pub contact: Option<String>,
    /// Citation keys of the publications the dataset draws on.
    pub source_ids: Vec<String>,
}

impl Contribution {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name.as_deref().unwrap_or_default(), self.id)
    }
}

/// A bibliographic reference cited by a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub id: String,
    pub citation: Option<String>,
    pub doi: Option<String>,
}
