//! Select command - choose the orthologs of two proteins in their shared species.
//!
//! Writes one multi-FASTA set per protein, ready for the external aligner.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::core::hit::HitCollection;
use crate::matching::{
    HitFilter, MatchingConfig, MatchingEngine, MirrorTreeConfig, OrthologSets, SelectionOrder,
};
use crate::parsing::fasta::{read_query_pair, write_sequence_set_file};
use crate::parsing::hits::parse_hit_report_file;
use crate::utils::validation::validate_file_stem;

#[derive(Args)]
pub struct SelectArgs {
    /// Homolog report of the first protein
    #[arg(required = true)]
    pub report_a: PathBuf,

    /// Homolog report of the second protein
    #[arg(required = true)]
    pub report_b: PathBuf,

    /// FASTA file holding the two query proteins, in report order
    #[arg(required = true)]
    pub queries: PathBuf,

    /// Directory for the multi-FASTA sets
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File stem of the sets: <prefix>1.fa and <prefix>2.fa
    #[arg(long, default_value = "multifasta")]
    pub prefix: String,

    /// Minimum number of shared species (default 11)
    #[arg(short, long)]
    pub threshold: Option<usize>,

    /// How each species' representative hit is chosen
    #[arg(long, value_enum)]
    pub order: Option<SelectionOrder>,

    /// Select both proteins' orthologs concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Filter the reports by e-value and identity first (thresholds from
    /// --evalue/--identity, else the config file, else 1e-5 and 30)
    #[arg(long)]
    pub filter: bool,

    /// Maximum e-value of kept hits; implies --filter
    #[arg(long)]
    pub evalue: Option<f64>,

    /// Minimum identical positions of kept hits; implies --filter
    #[arg(long)]
    pub identity: Option<u32>,
}

impl SelectArgs {
    fn matching_config(&self, config: &MirrorTreeConfig) -> MatchingConfig {
        MatchingConfig {
            significance_threshold: self
                .threshold
                .unwrap_or(config.matching.significance_threshold),
            order: self.order.unwrap_or(config.matching.order),
            parallel: self.parallel || config.matching.parallel,
        }
    }

    /// Pre-filter to apply, if any
    fn hit_filter(&self, config: &MirrorTreeConfig) -> Option<HitFilter> {
        if !self.filter && self.evalue.is_none() && self.identity.is_none() {
            return None;
        }
        Some(HitFilter {
            max_evalue: self.evalue.unwrap_or(config.filter.max_evalue),
            min_identity: self.identity.unwrap_or(config.filter.min_identity),
        })
    }

    fn output_paths(&self) -> anyhow::Result<(PathBuf, PathBuf)> {
        let prefix = validate_file_stem(&self.prefix)?;
        Ok((
            self.output_dir.join(format!("{prefix}1.fa")),
            self.output_dir.join(format!("{prefix}2.fa")),
        ))
    }
}

/// Execute the select command
///
/// # Errors
///
/// Returns an error if inputs cannot be parsed, too few species are shared,
/// or the sequence sets cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SelectArgs, format: OutputFormat, config: &MirrorTreeConfig) -> anyhow::Result<()> {
    let (path_a, path_b) = args.output_paths()?;

    let mut hits_a = parse_hit_report_file(&args.report_a)?;
    let mut hits_b = parse_hit_report_file(&args.report_b)?;
    if let Some(filter) = args.hit_filter(config) {
        hits_a = filter.apply(&hits_a);
        hits_b = filter.apply(&hits_b);
    }
    info!(
        "Report A: {} hits in {} species; report B: {} hits in {} species",
        hits_a.len(),
        hits_a.species().len(),
        hits_b.len(),
        hits_b.species().len()
    );

    let (query_a, query_b) = read_query_pair(&args.queries)?;

    let engine = MatchingEngine::new(args.matching_config(config));
    let sets = engine.select_orthologs(&hits_a, &hits_b, (&query_a, &query_b))?;

    std::fs::create_dir_all(&args.output_dir)?;
    write_sequence_set_file(&path_a, &sets.first)?;
    write_sequence_set_file(&path_b, &sets.second)?;

    let summary = SelectSummary {
        hits: (&hits_a, &hits_b),
        paths: (path_a.as_path(), path_b.as_path()),
        sets: &sets,
        config: engine.config(),
    };

    match format {
        OutputFormat::Text => summary.print_text(),
        OutputFormat::Json => summary.print_json()?,
        OutputFormat::Tsv => summary.print_tsv(),
    }

    Ok(())
}

struct SelectSummary<'a> {
    hits: (&'a HitCollection, &'a HitCollection),
    paths: (&'a Path, &'a Path),
    sets: &'a OrthologSets,
    config: &'a MatchingConfig,
}

impl SelectSummary<'_> {
    fn print_text(&self) {
        println!("Ortholog Selection");
        println!("{}", "=".repeat(60));

        println!(
            "\nShared species: {} (threshold {})",
            self.sets.shared_species.len(),
            self.config.significance_threshold
        );
        for species in &self.sets.shared_species {
            println!("  {species}");
        }

        for (label, hits, set, path) in [
            ("A", self.hits.0, &self.sets.first, self.paths.0),
            ("B", self.hits.1, &self.sets.second, self.paths.1),
        ] {
            println!("\nProtein {label}:");
            println!("  Hits: {}", hits.len());
            println!("  Sequences selected: {} (query included)", set.len());
            println!("  Written to: {}", path.display());
        }
    }

    fn print_json(&self) -> anyhow::Result<()> {
        let output = serde_json::json!({
            "config": self.config,
            "shared_species": self.sets.shared_species,
            "first": {
                "hits": self.hits.0.len(),
                "output": self.paths.0.display().to_string(),
                "sequences": self.sets.first,
            },
            "second": {
                "hits": self.hits.1.len(),
                "output": self.paths.1.display().to_string(),
                "sequences": self.sets.second,
            },
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn print_tsv(&self) {
        println!("protein\tidentifier\tspecies\tlength");
        for (label, set) in [("A", &self.sets.first), ("B", &self.sets.second)] {
            for seq in set {
                println!(
                    "{}\t{}\t{}\t{}",
                    label,
                    seq.identifier,
                    seq.species.as_deref().unwrap_or("query"),
                    seq.sequence.len()
                );
            }
        }
    }
}
