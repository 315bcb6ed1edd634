//! Core data types for ortholog matching and matrix correlation.
//!
//! This module provides the value types that flow through the pipeline:
//!
//! - [`HitRecord`](hit::HitRecord): A single homolog hit (species, identifier, sequence, metrics)
//! - [`HitCollection`](hit::HitCollection): All hits of one query protein, in report order
//! - [`QuerySequence`](sequence::QuerySequence): One of the two query proteins
//! - [`SelectedSequence`](sequence::SelectedSequence): A gap-free sequence chosen for alignment
//! - [`DistanceMatrix`](matrix::DistanceMatrix): Square pairwise distance matrix of one family
//!
//! ## Species Names
//!
//! Species are compared as **exact strings**. `Homo sapiens` and `homo sapiens`
//! are different species; no normalization is applied beyond trimming the
//! surrounding whitespace and quotes when a report is parsed.

pub mod hit;
pub mod matrix;
pub mod sequence;
