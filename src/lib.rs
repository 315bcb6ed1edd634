//! # mirrortree
//!
//! A library for detecting protein co-evolution with the mirror-tree method.
//!
//! Proteins that interact tend to evolve together: across the species that
//! carry both, their pairwise evolutionary distances correlate. `mirrortree`
//! takes the homolog searches of two query proteins, keeps the species found
//! in both, picks one ortholog per shared species, and, once those sets have
//! been aligned and turned into distance matrices, correlates the matrices.
//!
//! ## Features
//!
//! - **Hit report parsing**: Lazy, typed parsing of block-format homolog reports
//! - **Quality filtering**: E-value and identity thresholds
//! - **Shared species**: Intersection gated on a configurable significance threshold
//! - **Ortholog selection**: Best-scoring hit per species, query appended
//! - **Matrix correlation**: Pearson r with explicit errors for incomparable or constant matrices
//!
//! Alignment, tree building and bootstrapping are left to external tools.
//!
//! ## Example
//!
//! ```rust
//! use mirrortree::{correlate, DistanceMatrix};
//!
//! let a = DistanceMatrix::new(vec![
//!     vec![0.0, 1.0, 2.0],
//!     vec![1.0, 0.0, 1.0],
//!     vec![2.0, 1.0, 0.0],
//! ])
//! .unwrap();
//!
//! let result = correlate(&a, &a).unwrap();
//! assert!((result.coefficient - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Hit records, sequences, and distance matrices
//! - [`matching`]: Filtering, species intersection, ortholog selection, correlation
//! - [`parsing`]: Hit report, FASTA, and distance-matrix readers and writers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::hit::{HitCollection, HitRecord, SpeciesSet};
pub use crate::core::matrix::DistanceMatrix;
pub use crate::core::sequence::{QuerySequence, SelectedSequence};
pub use crate::matching::correlation::{correlate, CorrelationError, CorrelationResult};
pub use crate::matching::engine::{MatchingConfig, MatchingEngine};
pub use crate::matching::intersection::SelectionError;
pub use crate::parsing::ParseError;
