//! Ortholog matching and distance-matrix correlation.
//!
//! This module provides the core of a MirrorTree run:
//!
//! - [`HitFilter`]: Drops hits above an e-value or below an identity threshold
//! - [`species_intersection`]: Species present in both hit collections, gated on a threshold
//! - [`select_best_hits`]: One representative hit per shared species, plus the query
//! - [`correlate`]: Pearson correlation between two distance matrices
//! - [`MatchingEngine`]: Runs intersection and selection for a pair of proteins
//!
//! ## Selection Policy
//!
//! Hits are stable-sorted by score, highest first, and the first hit seen for
//! each shared species is kept. Equal scores fall back to report order.
//! [`SelectionOrder::SourceOrder`] skips the sort for reports that are known
//! to be ordered already.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mirrortree::core::sequence::QuerySequence;
//! use mirrortree::matching::{correlate, MatchingConfig, MatchingEngine};
//! use mirrortree::parsing::hits::parse_hit_report_file;
//! use mirrortree::parsing::matrix::parse_matrix_file;
//! use std::path::Path;
//!
//! let first = parse_hit_report_file(Path::new("blast1.out.blast")).unwrap();
//! let second = parse_hit_report_file(Path::new("blast2.out.blast")).unwrap();
//! let q1 = QuerySequence::new("query1", "MKVL");
//! let q2 = QuerySequence::new("query2", "MSTN");
//!
//! let engine = MatchingEngine::new(MatchingConfig::default());
//! let sets = engine.select_orthologs(&first, &second, (&q1, &q2)).unwrap();
//!
//! // ... align sets.first and sets.second, build distance matrices ...
//!
//! let a = parse_matrix_file(Path::new("family1.dist")).unwrap();
//! let b = parse_matrix_file(Path::new("family2.dist")).unwrap();
//! println!("r = {:.3}", correlate(&a, &b).unwrap().coefficient);
//! ```

pub mod correlation;
pub mod engine;
pub mod filter;
pub mod intersection;
pub mod selector;

pub use correlation::{correlate, CorrelationError, CorrelationResult};
pub use engine::{MatchingConfig, MatchingEngine, MirrorTreeConfig, OrthologSets};
pub use filter::HitFilter;
pub use intersection::{species_intersection, SelectionError, DEFAULT_SIGNIFICANCE_THRESHOLD};
pub use selector::{select_best_hits, SelectionOrder};
