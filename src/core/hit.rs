use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Set of species names
pub type SpeciesSet = HashSet<String>;

/// A single homolog hit from a homology search report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Subject identifier (e.g. `sp|P69905|HBA_HUMAN`)
    pub identifier: String,

    /// Aligned subject sequence, may contain gap characters
    pub sequence: String,

    /// Organism the subject belongs to
    pub species: String,

    /// Expectation value of the hit
    pub e_value: f64,

    /// Alignment score
    pub score: f64,

    /// Number of identical positions in the alignment
    pub identity: u32,

    /// Subject length, when the report provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl HitRecord {
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        species: impl Into<String>,
        sequence: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            sequence: sequence.into(),
            species: species.into(),
            e_value: 0.0,
            score: 0.0,
            identity: 0,
            length: None,
        }
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    #[must_use]
    pub fn with_e_value(mut self, e_value: f64) -> Self {
        self.e_value = e_value;
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: u32) -> Self {
        self.identity = identity;
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// All hits of one query protein's homology search, in report order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitCollection {
    /// Source file path (if known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub hits: Vec<HitRecord>,
}

impl HitCollection {
    #[must_use]
    pub fn new(hits: Vec<HitRecord>) -> Self {
        Self { source: None, hits }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitRecord> {
        self.hits.iter()
    }

    /// Distinct species represented in this collection
    #[must_use]
    pub fn species(&self) -> SpeciesSet {
        self.hits.iter().map(|h| h.species.clone()).collect()
    }
}

impl FromIterator<HitRecord> for HitCollection {
    fn from_iter<I: IntoIterator<Item = HitRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a HitCollection {
    type Item = &'a HitRecord;
    type IntoIter = std::slice::Iter<'a, HitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
