use pofatu_model::VocabularyStrictness;

/// Options controlling how entities are built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Treatment of out-of-vocabulary values in optional fields.
    pub strictness: VocabularyStrictness,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strictness(mut self, strictness: VocabularyStrictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Options rejecting every out-of-vocabulary value.
    pub fn strict() -> Self {
        Self::new().with_strictness(VocabularyStrictness::Strict)
    }
}
