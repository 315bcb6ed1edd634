use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::hit::{HitCollection, SpeciesSet};
use crate::core::sequence::{QuerySequence, SelectedSequence};
use crate::matching::filter::HitFilter;
use crate::matching::intersection::{
    species_intersection, SelectionError, DEFAULT_SIGNIFICANCE_THRESHOLD,
};
use crate::matching::selector::{select_best_hits, SelectionOrder};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration for ortholog matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum number of species shared by both hit collections
    pub significance_threshold: usize,
    /// How the representative hit of each species is chosen
    pub order: SelectionOrder,
    /// Run the two per-protein selections on separate threads
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
            order: SelectionOrder::default(),
            parallel: false,
        }
    }
}

/// Full run configuration, loadable from JSON.
///
/// Missing keys take their defaults, so `{}` is a valid config file:
///
/// ```json
/// {
///   "filter": { "max_evalue": 1e-5, "min_identity": 30 },
///   "matching": { "significance_threshold": 11, "order": "score_descending", "parallel": false }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorTreeConfig {
    pub filter: HitFilter,
    pub matching: MatchingConfig,
}

impl MirrorTreeConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read, or
    /// `ConfigError::ParseError` if it is not valid config JSON.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Orthologs chosen for both proteins of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthologSets {
    /// Species shared by both hit collections, sorted
    pub shared_species: Vec<String>,

    /// Sequences for the first protein, its query last
    pub first: Vec<SelectedSequence>,

    /// Sequences for the second protein, its query last
    pub second: Vec<SelectedSequence>,
}

/// The ortholog matching engine
pub struct MatchingEngine {
    config: MatchingConfig,
}

impl MatchingEngine {
    #[must_use]
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Species shared by both collections, gated on the significance threshold
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InsufficientHomology` if too few species are shared.
    pub fn shared_species(
        &self,
        first: &HitCollection,
        second: &HitCollection,
    ) -> Result<SpeciesSet, SelectionError> {
        species_intersection(first, second, self.config.significance_threshold)
    }

    /// Select the ortholog sets of both proteins.
    ///
    /// Nothing is selected when the threshold is not met.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InsufficientHomology` if too few species are shared.
    pub fn select_orthologs(
        &self,
        first: &HitCollection,
        second: &HitCollection,
        queries: (&QuerySequence, &QuerySequence),
    ) -> Result<OrthologSets, SelectionError> {
        let shared = self.shared_species(first, second)?;
        let order = self.config.order;

        let (first_set, second_set) = if self.config.parallel {
            std::thread::scope(|scope| {
                let handle = scope.spawn(|| select_best_hits(second, &shared, queries.1, order));
                let first_set = select_best_hits(first, &shared, queries.0, order);
                let second_set = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                (first_set, second_set)
            })
        } else {
            (
                select_best_hits(first, &shared, queries.0, order),
                select_best_hits(second, &shared, queries.1, order),
            )
        };

        info!(
            "{} shared species; selected {} and {} sequences",
            shared.len(),
            first_set.len(),
            second_set.len()
        );

        let mut shared_species: Vec<String> = shared.into_iter().collect();
        shared_species.sort_unstable();

        Ok(OrthologSets {
            shared_species,
            first: first_set,
            second: second_set,
        })
    }
}
