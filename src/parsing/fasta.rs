//! FASTA input and output using noodles.
//!
//! Reads the query proteins of a run and writes the selected ortholog sets
//! handed to the external aligner. Query files may be plain or gzip/bgzip
//! compressed.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.faa` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.faa.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.faa.bgz` (bgzip compressed)

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use tracing::warn;

use crate::core::sequence::{QuerySequence, SelectedSequence};
use crate::parsing::hits::ParseError;
use crate::utils::validation::is_gzipped;

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".faa.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".faa.bgz")
    {
        return true;
    }

    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "faa")
    )
}

/// Read every sequence of a FASTA file as a query
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, or `ParseError::InvalidFormat` if no sequences are found.
pub fn read_queries(path: &Path) -> Result<Vec<QuerySequence>, ParseError> {
    if !is_fasta_file(path) {
        warn!("{} does not have a FASTA extension", path.display());
    }
    let file = File::open(path)?;

    if is_gzipped(path) {
        let reader = BufReader::new(GzDecoder::new(file));
        read_queries_from(&mut fasta::io::Reader::new(reader))
    } else {
        let reader = BufReader::new(file);
        read_queries_from(&mut fasta::io::Reader::new(reader))
    }
}

fn read_queries_from<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<QuerySequence>, ParseError> {
    let mut queries = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let identifier = String::from_utf8_lossy(record.name()).to_string();
        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_string();
        queries.push(QuerySequence::new(identifier, sequence));
    }

    if queries.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(queries)
}

/// Read the two query proteins of a run, in file order
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the file holds fewer than two
/// sequences, or any error from [`read_queries`].
pub fn read_query_pair(path: &Path) -> Result<(QuerySequence, QuerySequence), ParseError> {
    let mut queries = read_queries(path)?.into_iter();

    match (queries.next(), queries.next()) {
        (Some(first), Some(second)) => {
            let extra = queries.count();
            if extra > 0 {
                warn!(
                    "{} holds {} extra sequences; only the first two are used",
                    path.display(),
                    extra
                );
            }
            Ok((first, second))
        }
        _ => Err(ParseError::InvalidFormat(format!(
            "{} must contain two query sequences",
            path.display()
        ))),
    }
}

/// Write a selected sequence set as multi-FASTA
///
/// # Errors
///
/// Returns any IO error from the underlying writer.
pub fn write_sequence_set<W: Write>(
    writer: W,
    sequences: &[SelectedSequence],
) -> std::io::Result<()> {
    use noodles::fasta::record::{Definition, Sequence};

    let mut fasta_writer = fasta::io::Writer::new(writer);

    for selected in sequences {
        let record = fasta::Record::new(
            Definition::new(selected.identifier.as_str(), None),
            Sequence::from(selected.sequence.as_bytes().to_vec()),
        );
        fasta_writer.write_record(&record)?;
    }

    Ok(())
}

/// Write a selected sequence set to a multi-FASTA file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be created or written.
pub fn write_sequence_set_file(
    path: &Path,
    sequences: &[SelectedSequence],
) -> Result<(), ParseError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_sequence_set(&mut writer, sequences)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("queries.fa")));
        assert!(is_fasta_file(Path::new("queries.fasta")));
        assert!(is_fasta_file(Path::new("queries.faa")));
        assert!(is_fasta_file(Path::new("queries.fa.gz")));
        assert!(is_fasta_file(Path::new("/path/to/Queries.FASTA")));

        assert!(!is_fasta_file(Path::new("blast1.xml")));
        assert!(!is_fasta_file(Path::new("blast1.out.blast")));
    }

    #[test]
    fn test_read_query_pair() {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(b">prot1 first protein\nMKVL\nAAGT\n>prot2\nMSTN\n")
            .unwrap();
        temp.flush().unwrap();

        let (first, second) = read_query_pair(temp.path()).unwrap();
        assert_eq!(first.identifier, "prot1");
        assert_eq!(first.sequence, "MKVLAAGT");
        assert_eq!(second.identifier, "prot2");
        assert_eq!(second.sequence, "MSTN");
    }

    #[test]
    fn test_read_query_pair_needs_two() {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(b">prot1\nMKVL\n").unwrap();
        temp.flush().unwrap();

        assert!(matches!(
            read_query_pair(temp.path()),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_read_empty_fasta() {
        let temp = NamedTempFile::with_suffix(".fa").unwrap();
        assert!(read_queries(temp.path()).is_err());
    }

    #[test]
    fn test_write_sequence_set() {
        let sequences = vec![
            SelectedSequence::new("sp|P1|A", "MK-VL").with_species("Homo sapiens"),
            SelectedSequence::new("query", "MKVL"),
        ];

        let mut out = Vec::new();
        write_sequence_set(&mut out, &sequences).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, ">sp|P1|A\nMKVL\n>query\nMKVL\n");
    }

    #[test]
    fn test_written_set_reads_back() {
        let temp = NamedTempFile::with_suffix(".fa").unwrap();
        let sequences = vec![
            SelectedSequence::new("a", "MKVL"),
            SelectedSequence::new("b", "MSTN"),
        ];
        write_sequence_set_file(temp.path(), &sequences).unwrap();

        let queries = read_queries(temp.path()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].sequence, "MSTN");
    }
}
