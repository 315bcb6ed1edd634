use thiserror::Error;
use tracing::debug;

use crate::core::hit::{HitCollection, SpeciesSet};

/// Default minimum number of shared species for a meaningful comparison.
///
/// Smaller trees carry too little phylogenetic signal for the correlation
/// between their distance matrices to mean anything.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: usize = 11;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error(
        "Not enough homologs after filtering: {shared} shared species, at least {threshold} required"
    )]
    InsufficientHomology { shared: usize, threshold: usize },
}

/// Species represented in both hit collections.
///
/// # Errors
///
/// Returns `SelectionError::InsufficientHomology` with the observed count if
/// fewer than `threshold` species are shared.
pub fn species_intersection(
    a: &HitCollection,
    b: &HitCollection,
    threshold: usize,
) -> Result<SpeciesSet, SelectionError> {
    let species_a = a.species();
    let species_b = b.species();

    let shared: SpeciesSet = species_a.intersection(&species_b).cloned().collect();

    debug!(
        "{} species in A, {} in B, {} shared (threshold {})",
        species_a.len(),
        species_b.len(),
        shared.len(),
        threshold
    );

    if shared.len() < threshold {
        return Err(SelectionError::InsufficientHomology {
            shared: shared.len(),
            threshold,
        });
    }

    Ok(shared)
}
