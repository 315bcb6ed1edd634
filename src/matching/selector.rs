use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::hit::{HitCollection, HitRecord, SpeciesSet};
use crate::core::sequence::{QuerySequence, SelectedSequence};

/// Order in which hits compete for their species' slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Highest score wins; equal scores fall back to report order
    #[default]
    ScoreDescending,
    /// First hit in the report wins (assumes the report is already sorted)
    SourceOrder,
}

/// Pick one representative hit per shared species, then append the query.
///
/// Every species in `shared` that occurs in `collection` contributes exactly
/// one sequence, gaps stripped. The query is always last, whatever its
/// species. Output is deterministic for identical input.
#[must_use]
pub fn select_best_hits(
    collection: &HitCollection,
    shared: &SpeciesSet,
    query: &QuerySequence,
    order: SelectionOrder,
) -> Vec<SelectedSequence> {
    let mut candidates: Vec<&HitRecord> = collection
        .iter()
        .filter(|h| shared.contains(&h.species))
        .collect();

    if order == SelectionOrder::ScoreDescending {
        // stable: ties keep report order
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(shared.len());
    let mut selected: Vec<SelectedSequence> = candidates
        .into_iter()
        .filter(|&h| seen.insert(h.species.as_str()))
        .map(|h| SelectedSequence::new(h.identifier.clone(), &h.sequence).with_species(&h.species))
        .collect();

    debug!(
        "Selected {} of {} shared species for query {}",
        selected.len(),
        shared.len(),
        query.identifier
    );

    selected.push(SelectedSequence::from(query));
    selected
}
