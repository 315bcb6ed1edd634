//! Command-line interface for mirrortree.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **filter**: Keep the hits of a report that pass e-value and identity thresholds
//! - **select**: Pick one ortholog per shared species for two proteins and write multi-FASTA sets
//! - **correlate**: Correlate the distance matrices of the two aligned families
//!
//! ## Usage
//!
//! ```text
//! # Filter raw homolog reports
//! mirrortree filter blast1.report -o blast1.out.blast --evalue 1e-5 --identity 30
//! mirrortree filter blast2.report -o blast2.out.blast
//!
//! # Select orthologs; writes multifasta1.fa and multifasta2.fa
//! mirrortree select blast1.out.blast blast2.out.blast queries.fa
//!
//! # ... align both sets and build distance matrices externally ...
//!
//! # Correlate the matrices
//! mirrortree correlate family1.dist family2.dist --format json
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::matching::MirrorTreeConfig;

pub mod correlate;
pub mod filter;
pub mod select;

#[derive(Parser)]
#[command(name = "mirrortree")]
#[command(version)]
#[command(about = "Detect protein co-evolution by correlating ortholog distance matrices")]
#[command(
    long_about = "mirrortree compares the evolutionary histories of two proteins.\n\nIt finds the species present in the homolog searches of both proteins, keeps the best hit of each shared species, and, once the two sets have been aligned and turned into distance matrices by external tools, reports the Pearson correlation between the matrices.\n\nHigh correlation suggests the two proteins co-evolve and may interact."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// JSON config file with filter and matching settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a homolog report by e-value and identity
    Filter(filter::FilterArgs),

    /// Select orthologs in species shared by two homolog reports
    Select(select::SelectArgs),

    /// Correlate two distance matrices
    Correlate(correlate::CorrelateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the run configuration, falling back to defaults
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MirrorTreeConfig> {
    match path {
        Some(path) => {
            let config = MirrorTreeConfig::load_from_file(path)?;
            debug!("Loaded config from {}: {config:?}", path.display());
            Ok(config)
        }
        None => Ok(MirrorTreeConfig::default()),
    }
}
