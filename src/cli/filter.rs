//! Filter command - keep the hits of a report that pass quality thresholds.
//!
//! Hits with an empty species field (`Hit_species: []`) are dropped with a
//! warning; any other malformed block fails the command.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::core::hit::HitCollection;
use crate::matching::{HitFilter, MirrorTreeConfig};
use crate::parsing::hits::{parse_hit_report_file_skip_unassigned, write_hit_report};

#[derive(Args)]
pub struct FilterArgs {
    /// Homolog report to filter (plain or .gz)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output report; writes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum e-value of kept hits (default 1e-5)
    #[arg(short, long)]
    pub evalue: Option<f64>,

    /// Minimum identical positions of kept hits (default 30)
    #[arg(short, long)]
    pub identity: Option<u32>,
}

impl FilterArgs {
    /// Config values overridden by any flags given
    fn hit_filter(&self, config: &MirrorTreeConfig) -> HitFilter {
        HitFilter {
            max_evalue: self.evalue.unwrap_or(config.filter.max_evalue),
            min_identity: self.identity.unwrap_or(config.filter.min_identity),
        }
    }
}

/// Execute the filter command
///
/// # Errors
///
/// Returns an error if the report cannot be parsed or the output written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FilterArgs, format: OutputFormat, config: &MirrorTreeConfig) -> anyhow::Result<()> {
    let filter = args.hit_filter(config);
    let hits = parse_hit_report_file_skip_unassigned(&args.input)?;
    let kept = filter.apply(&hits);

    info!(
        "Kept {} of {} hits with e-value <= {:e} and identity >= {}",
        kept.len(),
        hits.len(),
        filter.max_evalue,
        filter.min_identity
    );

    let Some(output) = &args.output else {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        write_hit_report(&mut writer, &kept)?;
        writer.flush()?;
        return Ok(());
    };

    let mut writer = BufWriter::new(File::create(output)?);
    write_hit_report(&mut writer, &kept)?;
    writer.flush()?;

    match format {
        OutputFormat::Text => print_text_summary(&args, &filter, &hits, &kept),
        OutputFormat::Json => print_json_summary(&args, &filter, &hits, &kept)?,
        OutputFormat::Tsv => print_tsv_summary(&args, &filter, &hits, &kept),
    }

    Ok(())
}

fn print_text_summary(
    args: &FilterArgs,
    filter: &HitFilter,
    hits: &HitCollection,
    kept: &HitCollection,
) {
    println!("Filter Results");
    println!("{}", "=".repeat(60));
    println!("\nInput: {}", args.input.display());
    if let Some(output) = &args.output {
        println!("Output: {}", output.display());
    }
    println!("\nThresholds:");
    println!("  Max e-value: {:e}", filter.max_evalue);
    println!("  Min identity: {}", filter.min_identity);
    println!("\nHits: {} kept of {}", kept.len(), hits.len());
    println!("Species: {} kept of {}", kept.species().len(), hits.species().len());
}

fn print_json_summary(
    args: &FilterArgs,
    filter: &HitFilter,
    hits: &HitCollection,
    kept: &HitCollection,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input": args.input.display().to_string(),
        "output": args.output.as_ref().map(|p| p.display().to_string()),
        "filter": filter,
        "hits": {
            "total": hits.len(),
            "kept": kept.len(),
        },
        "species": {
            "total": hits.species().len(),
            "kept": kept.species().len(),
        },
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(
    args: &FilterArgs,
    filter: &HitFilter,
    hits: &HitCollection,
    kept: &HitCollection,
) {
    println!("input\tmax_evalue\tmin_identity\thits_total\thits_kept\tspecies_total\tspecies_kept");
    println!(
        "{}\t{:e}\t{}\t{}\t{}\t{}\t{}",
        args.input.display(),
        filter.max_evalue,
        filter.min_identity,
        hits.len(),
        kept.len(),
        hits.species().len(),
        kept.species().len(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::hits::parse_hit_report_text;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_config() {
        let args = FilterArgs {
            input: PathBuf::from("blast1.report"),
            output: None,
            evalue: Some(1e-10),
            identity: None,
        };
        let config = MirrorTreeConfig::default();

        let filter = args.hit_filter(&config);
        assert!((filter.max_evalue - 1e-10).abs() < f64::EPSILON);
        assert_eq!(filter.min_identity, config.filter.min_identity);
    }

    #[test]
    fn test_run_writes_filtered_report() {
        let mut input = NamedTempFile::with_suffix(".report").unwrap();
        write!(
            input,
            "#####\nHit_species: [Homo sapiens]\nHit_id: keep\nE-value: 1e-40\nScore: 300\nIdentity: 90\nHit_Sequence: MKV\n\
             #####\nHit_species: [Mus musculus]\nHit_id: drop\nE-value: 0.5\nScore: 20\nIdentity: 90\nHit_Sequence: MKV\n"
        )
        .unwrap();
        input.flush().unwrap();
        let output = NamedTempFile::with_suffix(".out.blast").unwrap();

        let args = FilterArgs {
            input: input.path().to_path_buf(),
            output: Some(output.path().to_path_buf()),
            evalue: None,
            identity: None,
        };
        run(args, OutputFormat::Tsv, &MirrorTreeConfig::default()).unwrap();

        let written = std::fs::read_to_string(output.path()).unwrap();
        let kept = parse_hit_report_text(&written).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.hits[0].identifier, "keep");
    }
}
