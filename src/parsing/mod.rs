//! Parsers and writers for the files exchanged with external tools.
//!
//! This module provides:
//!
//! - **Hit reports**: Flat block-format homolog reports, read lazily and written back
//! - **FASTA**: Query proteins in, selected ortholog sets out
//! - **Distance matrices**: PHYLIP square, lower-triangular, or plain numeric grids
//!
//! ## Example
//!
//! ```rust,no_run
//! use mirrortree::parsing::hits::parse_hit_report_file;
//! use mirrortree::parsing::matrix::parse_matrix_text;
//! use std::path::Path;
//!
//! let hits = parse_hit_report_file(Path::new("blast1.out.blast")).unwrap();
//! println!("{} hits", hits.len());
//!
//! let matrix = parse_matrix_text("0 1\n1 0\n").unwrap();
//! assert_eq!(matrix.size(), 2);
//! ```
//!
//! ## Hit Report Fields
//!
//! | Key | Field | Required |
//! |-----|-------|----------|
//! | `Hit_species` | Species, in brackets | Yes |
//! | `Hit_id` | Subject identifier | Yes |
//! | `E-value` | Expectation value | Yes |
//! | `Score` | Alignment score | Yes |
//! | `Identity` | Identical positions | Yes |
//! | `Hit_Sequence` | Aligned subject sequence | Yes |
//! | `Length` | Subject length | No |

pub mod fasta;
pub mod hits;
pub mod matrix;

pub use hits::ParseError;
