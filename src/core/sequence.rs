use serde::{Deserialize, Serialize};

/// Gap character used in aligned sequences
pub const GAP: char = '-';

/// Remove alignment gap characters from a sequence
#[must_use]
pub fn strip_gaps(sequence: &str) -> String {
    sequence.chars().filter(|&c| c != GAP).collect()
}

/// One of the two query proteins of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySequence {
    pub identifier: String,
    pub sequence: String,
}

impl QuerySequence {
    pub fn new(identifier: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            sequence: sequence.into(),
        }
    }
}

/// A sequence chosen to feed the external alignment step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSequence {
    pub identifier: String,

    /// Ungapped residues
    pub sequence: String,

    /// Species this ortholog was picked for; `None` for the query itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

impl SelectedSequence {
    /// Build from a possibly gapped sequence, stripping gaps
    pub fn new(identifier: impl Into<String>, sequence: &str) -> Self {
        Self {
            identifier: identifier.into(),
            sequence: strip_gaps(sequence),
            species: None,
        }
    }

    #[must_use]
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    #[must_use]
    pub fn is_query(&self) -> bool {
        self.species.is_none()
    }
}

impl From<&QuerySequence> for SelectedSequence {
    fn from(query: &QuerySequence) -> Self {
        Self::new(query.identifier.clone(), &query.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_gaps() {
        assert_eq!(strip_gaps("MK--V-L"), "MKVL");
        assert_eq!(strip_gaps("---"), "");
        assert_eq!(strip_gaps("MKVL"), "MKVL");
    }

    #[test]
    fn test_selected_from_query_is_query() {
        let query = QuerySequence::new("query1", "MKV-L");
        let selected = SelectedSequence::from(&query);
        assert!(selected.is_query());
        assert_eq!(selected.sequence, "MKVL");
    }
}
