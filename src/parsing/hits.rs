//! Parser and writer for flat homolog-hit reports.
//!
//! A report is a sequence of record blocks, each introduced by a delimiter
//! line starting with `#`. Inside a block every line is `Key: value`, except
//! the species line whose value is enclosed in brackets:
//!
//! ```text
//! ##########Alignment##########
//! Hit_species: [Homo sapiens]
//! Hit_id: sp|P69905|HBA_HUMAN
//! Length: 142
//! E-value: 2e-98
//! Score: 732
//! Identity: 141
//! Hit_Sequence: MVLSPADKTNVKAAWGKVGAHAGEYGAEALERMFLSFPTTKTYFPHF-DLSHGSAQVKGHGKKVADALTNAVAHV
//! ```
//!
//! The list-literal species form written by older tooling (`['Homo sapiens']`)
//! is accepted as well; the first listed species is used.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::hit::{HitCollection, HitRecord};
use crate::core::matrix::MatrixError;
use crate::utils::validation::{check_hit_limit, is_gzipped, MAX_HITS};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hit block {block} is missing required field '{field}'")]
    MissingField { block: usize, field: &'static str },

    #[error("Hit block {block} has an invalid {field} value: '{value}'")]
    InvalidValue {
        block: usize,
        field: &'static str,
        value: String,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Invalid distance matrix: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Too many hits: {0} exceeds maximum allowed ({max})", max = MAX_HITS)]
    TooManyHits(usize),
}

/// Delimiter written between record blocks
pub const BLOCK_DELIMITER: &str = "##########Alignment##########";

/// Lazy, single-pass reader over the blocks of a hit report.
///
/// Yields one `HitRecord` per block in source order. After the first error
/// the reader is exhausted.
///
/// A block whose species brackets are empty (`Hit_species: []`) is an error
/// unless [`HitReader::skip_unassigned`] is set, in which case it is dropped
/// with a warning.
pub struct HitReader<R> {
    lines: Lines<R>,
    block: Vec<String>,
    blocks_read: usize,
    skip_unassigned: bool,
    skipped: usize,
    done: bool,
}

impl<R: BufRead> HitReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            block: Vec::new(),
            blocks_read: 0,
            skip_unassigned: false,
            skipped: 0,
            done: false,
        }
    }

    /// Drop blocks with an empty species field instead of failing
    #[must_use]
    pub fn skip_unassigned(mut self, skip: bool) -> Self {
        self.skip_unassigned = skip;
        self
    }

    /// Number of blocks dropped so far for lacking a species
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Parse the buffered block; `None` when it was skipped
    fn finish_block(&mut self) -> Option<Result<HitRecord, ParseError>> {
        if check_hit_limit(self.blocks_read).is_some() {
            return Some(Err(ParseError::TooManyHits(self.blocks_read)));
        }
        self.blocks_read += 1;
        let block = self.blocks_read;
        let lines = std::mem::take(&mut self.block);

        match parse_block(block, &lines) {
            Err(ParseError::MissingField {
                field: "species", ..
            }) if self.skip_unassigned && has_species_line(&lines) => {
                warn!("Skipping hit block {block}: no species assigned");
                self.skipped += 1;
                None
            }
            result => Some(result),
        }
    }
}

impl<R: BufRead> Iterator for HitReader<R> {
    type Item = Result<HitRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    let line = line.trim();
                    if line.starts_with('#') {
                        if !self.block.is_empty() {
                            if let Some(result) = self.finish_block() {
                                self.done = result.is_err();
                                return Some(result);
                            }
                        }
                    } else if !line.is_empty() {
                        self.block.push(line.to_string());
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(ParseError::Io(e)));
                }
                None => {
                    self.done = true;
                    if self.block.is_empty() {
                        return None;
                    }
                    return self.finish_block();
                }
            }
        }
    }
}

/// Field a block line contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Species,
    Identifier,
    Length,
    EValue,
    Score,
    Identity,
    Sequence,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim_end_matches(':').to_ascii_lowercase();
        match key.as_str() {
            "hit_species" | "hit_specie" | "species" => Some(Self::Species),
            "hit_id" | "id" | "identifier" => Some(Self::Identifier),
            "length" => Some(Self::Length),
            "e-value" | "evalue" | "expect" => Some(Self::EValue),
            "score" => Some(Self::Score),
            "identity" | "identities" => Some(Self::Identity),
            "hit_sequence" | "sequence" => Some(Self::Sequence),
            _ => None,
        }
    }
}

#[derive(Default)]
struct BlockFields<'a> {
    species: Option<String>,
    identifier: Option<&'a str>,
    length: Option<&'a str>,
    e_value: Option<&'a str>,
    score: Option<&'a str>,
    identity: Option<&'a str>,
    sequence: Option<&'a str>,
}

fn parse_block(block: usize, lines: &[String]) -> Result<HitRecord, ParseError> {
    let mut fields = BlockFields::default();

    for line in lines {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };

        let field = if key.starts_with('[') {
            Some(Field::Species)
        } else {
            Field::from_key(key)
        };

        match field {
            Some(Field::Species) => fields.species = bracketed_species(line),
            Some(Field::Identifier) => fields.identifier = tokens.next(),
            Some(Field::Length) => fields.length = tokens.next(),
            Some(Field::EValue) => fields.e_value = tokens.next(),
            Some(Field::Score) => fields.score = tokens.next(),
            Some(Field::Identity) => fields.identity = tokens.next(),
            Some(Field::Sequence) => fields.sequence = tokens.next(),
            None => debug!("Ignoring unknown key '{key}' in hit block {block}"),
        }
    }

    let species = fields.species.ok_or(ParseError::MissingField {
        block,
        field: "species",
    })?;
    let identifier = required(block, "identifier", fields.identifier)?;
    let sequence = required(block, "sequence", fields.sequence)?;
    let e_value = parse_value(block, "e-value", required(block, "e-value", fields.e_value)?)?;
    let score = parse_value(block, "score", required(block, "score", fields.score)?)?;
    let identity = parse_value(block, "identity", required(block, "identity", fields.identity)?)?;

    let mut hit = HitRecord::new(identifier, species, sequence)
        .with_e_value(e_value)
        .with_score(score)
        .with_identity(identity);

    if let Some(length) = fields.length {
        hit = hit.with_length(parse_value(block, "length", length)?);
    }

    Ok(hit)
}

fn required<'a>(
    block: usize,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ParseError> {
    value.ok_or(ParseError::MissingField { block, field })
}

fn parse_value<T: std::str::FromStr>(
    block: usize,
    field: &'static str,
    value: &str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        block,
        field,
        value: value.to_string(),
    })
}

fn has_species_line(lines: &[String]) -> bool {
    lines.iter().any(|line| {
        line.starts_with('[')
            || line
                .split_whitespace()
                .next()
                .and_then(Field::from_key)
                .is_some_and(|field| field == Field::Species)
    })
}

/// Extract the species enclosed in brackets, e.g. `[Homo sapiens]` or
/// `['Homo sapiens', 'Pan troglodytes']` (first entry wins).
fn bracketed_species(line: &str) -> Option<String> {
    let start = line.find('[')?;
    let end = line.rfind(']')?;
    if end <= start {
        return None;
    }

    let inner = line[start + 1..end].trim();
    let species = match inner.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let rest = &inner[1..];
            rest.find(quote).map_or(rest, |close| &rest[..close])
        }
        _ => inner,
    };

    let species = species.trim();
    if species.is_empty() {
        None
    } else {
        Some(species.to_string())
    }
}

/// Parse hit report text into a collection
///
/// # Errors
///
/// Returns `ParseError::MissingField` or `ParseError::InvalidValue` for the
/// first malformed block, or `ParseError::TooManyHits` if the limit is exceeded.
pub fn parse_hit_report_text(text: &str) -> Result<HitCollection, ParseError> {
    HitReader::new(text.as_bytes()).collect()
}

/// Parse a hit report file (plain or gzip-compressed)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any block error
/// from [`parse_hit_report_text`].
pub fn parse_hit_report_file(path: &Path) -> Result<HitCollection, ParseError> {
    let file = File::open(path)?;

    let collection: HitCollection = if is_gzipped(path) {
        HitReader::new(BufReader::new(GzDecoder::new(file)))
            .collect::<Result<HitCollection, ParseError>>()?
    } else {
        HitReader::new(BufReader::new(file)).collect::<Result<HitCollection, ParseError>>()?
    };

    debug!("Parsed {} hits from {}", collection.len(), path.display());

    Ok(collection.with_source(path.display().to_string()))
}

/// Parse a hit report file, dropping blocks that have no species assigned
///
/// Raw search output lists hits whose organism is unknown as
/// `Hit_species: []`; each dropped block is logged with `warn!`.
///
/// # Errors
///
/// Same as [`parse_hit_report_file`], except for empty species fields.
pub fn parse_hit_report_file_skip_unassigned(
    path: &Path,
) -> Result<HitCollection, ParseError> {
    let file = File::open(path)?;

    let (collection, skipped) = if is_gzipped(path) {
        collect_hits(HitReader::new(BufReader::new(GzDecoder::new(file))).skip_unassigned(true))?
    } else {
        collect_hits(HitReader::new(BufReader::new(file)).skip_unassigned(true))?
    };

    debug!(
        "Parsed {} hits from {} ({skipped} without species skipped)",
        collection.len(),
        path.display()
    );

    Ok(collection.with_source(path.display().to_string()))
}

fn collect_hits<R: BufRead>(
    mut reader: HitReader<R>,
) -> Result<(HitCollection, usize), ParseError> {
    let collection = reader
        .by_ref()
        .collect::<Result<HitCollection, ParseError>>()?;
    Ok((collection, reader.skipped()))
}

/// Write hits in the block format read by [`HitReader`]
///
/// # Errors
///
/// Returns any IO error from the underlying writer.
pub fn write_hit_report<'a, W, I>(writer: &mut W, hits: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a HitRecord>,
{
    for hit in hits {
        writeln!(writer, "{BLOCK_DELIMITER}")?;
        writeln!(writer, "Hit_species: [{}]", hit.species)?;
        writeln!(writer, "Hit_id: {}", hit.identifier)?;
        if let Some(length) = hit.length {
            writeln!(writer, "Length: {length}")?;
        }
        writeln!(writer, "E-value: {:e}", hit.e_value)?;
        writeln!(writer, "Score: {}", hit.score)?;
        writeln!(writer, "Identity: {}", hit.identity)?;
        writeln!(writer, "Hit_Sequence: {}", hit.sequence)?;
    }
    Ok(())
}
