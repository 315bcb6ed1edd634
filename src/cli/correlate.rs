//! Correlate command - Pearson correlation between two distance matrices.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::core::matrix::DistanceMatrix;
use crate::matching::correlation::{correlate, CorrelationResult};
use crate::parsing::matrix::parse_matrix_file;

#[derive(Args)]
pub struct CorrelateArgs {
    /// Distance matrix of the first protein family
    #[arg(required = true)]
    pub matrix_a: PathBuf,

    /// Distance matrix of the second protein family
    #[arg(required = true)]
    pub matrix_b: PathBuf,
}

/// Execute the correlate command
///
/// # Errors
///
/// Returns an error if either matrix cannot be parsed, the matrices differ in
/// size, or either has zero variance.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CorrelateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let matrix_a = parse_matrix_file(&args.matrix_a)?;
    let matrix_b = parse_matrix_file(&args.matrix_b)?;

    if !matrix_a.labels.is_empty() && matrix_a.labels.len() == matrix_b.labels.len() {
        info!("Taxa A: {}", matrix_a.labels.join(", "));
        info!("Taxa B: {}", matrix_b.labels.join(", "));
    }

    let result = correlate(&matrix_a, &matrix_b)?;

    match format {
        OutputFormat::Text => print_text_result(&args, &matrix_a, &matrix_b, &result),
        OutputFormat::Json => print_json_result(&args, &result)?,
        OutputFormat::Tsv => print_tsv_result(&args, &result),
    }

    Ok(())
}

fn print_text_result(
    args: &CorrelateArgs,
    matrix_a: &DistanceMatrix,
    matrix_b: &DistanceMatrix,
    result: &CorrelationResult,
) {
    println!("Correlation Results");
    println!("{}", "=".repeat(60));

    println!("\nMatrix A: {} ({} taxa)", args.matrix_a.display(), matrix_a.size());
    println!("Matrix B: {} ({} taxa)", args.matrix_b.display(), matrix_b.size());

    println!("\nPearson r: {:.3}", result.coefficient);
    println!("  Paired distances: {}", result.values);
    println!(
        "  Regression: B = {:.4} * A + {:.4}",
        result.slope, result.intercept
    );
}

fn print_json_result(args: &CorrelateArgs, result: &CorrelationResult) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "matrix_a": args.matrix_a.display().to_string(),
        "matrix_b": args.matrix_b.display().to_string(),
        "correlation": result,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_result(args: &CorrelateArgs, result: &CorrelationResult) {
    println!("matrix_a\tmatrix_b\tsize\tvalues\tpearson_r\tslope\tintercept");
    println!(
        "{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}",
        args.matrix_a.display(),
        args.matrix_b.display(),
        result.size,
        result.values,
        result.coefficient,
        result.slope,
        result.intercept,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::CorrelationError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn matrix_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".dist").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_run_correlates_files() {
        let a = matrix_file("0 1 2\n1 0 1\n2 1 0\n");
        let b = matrix_file("3\nx 0 1 2\ny 1 0 1\nz 2 1 0\n");

        let args = CorrelateArgs {
            matrix_a: a.path().to_path_buf(),
            matrix_b: b.path().to_path_buf(),
        };
        assert!(run(args, OutputFormat::Json).is_ok());
    }

    #[test]
    fn test_run_reports_dimension_mismatch() {
        let a = matrix_file("0 1 2\n1 0 1\n2 1 0\n");
        let b = matrix_file("0 1\n1 0\n");

        let args = CorrelateArgs {
            matrix_a: a.path().to_path_buf(),
            matrix_b: b.path().to_path_buf(),
        };
        let err = run(args, OutputFormat::Text).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CorrelationError>(),
            Some(&CorrelationError::DimensionMismatch { left: 9, right: 4 })
        );
    }
}
