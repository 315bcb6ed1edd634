//! Parser for distance-matrix files produced by external tree builders.
//!
//! Three layouts are accepted:
//!
//! - **PHYLIP**: a taxon-count line, then `label v1 ... vn` per row (square or
//!   lower triangle). Labels are taken by position, so numeric taxon names work
//! - **Lower triangle**: `label v1 ... vi` per row, diagonal included or not,
//!   optionally followed by a footer line of labels (as printed by Biopython)
//! - **Plain grid**: whitespace-, tab- or comma-separated numbers, no labels
//!
//! Lines starting with `#` are comments.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::core::matrix::DistanceMatrix;
use crate::parsing::hits::ParseError;
use crate::utils::validation::{check_matrix_limit, is_gzipped};

/// Parse a distance matrix file (plain or gzip-compressed)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_matrix_text`].
pub fn parse_matrix_file(path: &Path) -> Result<DistanceMatrix, ParseError> {
    let content = if is_gzipped(path) {
        let mut content = String::new();
        GzDecoder::new(std::fs::File::open(path)?).read_to_string(&mut content)?;
        content
    } else {
        std::fs::read_to_string(path)?
    };

    let matrix = parse_matrix_text(&content)?;
    debug!(
        "Parsed {}x{} distance matrix from {}",
        matrix.size(),
        matrix.size(),
        path.display()
    );
    Ok(matrix)
}

/// Parse distance matrix text in any of the supported layouts
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for non-numeric values, a taxon count
/// that disagrees with the rows, or an empty input; `ParseError::Matrix` if
/// the rows do not form a square or triangular matrix.
pub fn parse_matrix_text(text: &str) -> Result<DistanceMatrix, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .peekable();

    // PHYLIP taxon-count line. A lone `0` is the first row of an unlabelled
    // lower triangle, not a count.
    let mut declared = None;
    if let Some((_, first)) = lines.peek() {
        let tokens: Vec<&str> = split_fields(first).collect();
        if let [token] = tokens.as_slice() {
            if let Ok(n) = token.parse::<usize>() {
                if n > 0 {
                    declared = Some(n);
                    lines.next();
                }
            }
        }
    }

    let mut labels = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_num, line) in lines {
        let tokens: Vec<&str> = split_fields(line).collect();

        // Every row after a count line starts with its label
        let (label, values) = if declared.is_some() {
            match tokens.split_first() {
                Some((first, rest)) => (Some(*first), rest),
                None => continue,
            }
        } else {
            if !rows.is_empty() && !tokens.iter().any(|t| is_distance(t)) {
                debug!("Skipping label footer on line {line_num}");
                break;
            }
            match tokens.split_first() {
                Some((first, rest)) if !is_distance(first) => (Some(*first), rest),
                _ => (None, tokens.as_slice()),
            }
        };

        let row = values
            .iter()
            .map(|v| {
                v.parse::<f64>().map_err(|_| {
                    ParseError::InvalidFormat(format!("Invalid distance on line {line_num}: '{v}'"))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if check_matrix_limit(rows.len()).is_some() {
            return Err(ParseError::InvalidFormat(format!(
                "Too many matrix rows on line {line_num}"
            )));
        }

        if let Some(label) = label {
            labels.push(label.to_string());
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No matrix rows found".to_string(),
        ));
    }

    if let Some(n) = declared {
        if n != rows.len() {
            return Err(ParseError::InvalidFormat(format!(
                "Matrix declares {n} taxa but has {} rows",
                rows.len()
            )));
        }
    }

    let size = rows.len();
    let matrix = if rows.iter().all(|r| r.len() == size) {
        DistanceMatrix::new(rows)?
    } else if rows.iter().enumerate().all(|(i, r)| r.len() == i + 1) {
        DistanceMatrix::from_lower_triangle(rows)?
    } else if rows.iter().enumerate().all(|(i, r)| r.len() == i) {
        // Strict lower triangle, zero diagonal
        let lower = rows
            .into_iter()
            .map(|mut r| {
                r.push(0.0);
                r
            })
            .collect();
        DistanceMatrix::from_lower_triangle(lower)?
    } else {
        DistanceMatrix::new(rows)?
    };

    if labels.len() == size {
        Ok(matrix.with_labels(labels)?)
    } else {
        Ok(matrix)
    }
}

/// A finite number; `nan` and `inf` are taxon names in headerless input
fn is_distance(token: &str) -> bool {
    token.parse::<f64>().is_ok_and(f64::is_finite)
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::MatrixError;

    fn expected() -> Vec<f64> {
        vec![0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0]
    }

    #[test]
    fn test_plain_grid() {
        let m = parse_matrix_text("0 1 2\n1 0 1\n2 1 0\n").unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
        assert!(m.labels.is_empty());
    }

    #[test]
    fn test_csv_grid() {
        let m = parse_matrix_text("0,1,2\n1,0,1\n2,1,0\n").unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
    }

    #[test]
    fn test_phylip_square() {
        let text = "3\nhuman 0 1 2\nmouse 1 0 1\nzebrafish 2 1 0\n";
        let m = parse_matrix_text(text).unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
        assert_eq!(m.labels, vec!["human", "mouse", "zebrafish"]);
    }

    #[test]
    fn test_lower_triangle_with_footer() {
        let text = "human\t0\nmouse\t1\t0\nzebrafish\t2\t1\t0\n\thuman\tmouse\tzebrafish\n";
        let m = parse_matrix_text(text).unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
        assert_eq!(m.labels.len(), 3);
    }

    #[test]
    fn test_strict_lower_triangle() {
        let text = "3\nhuman\nmouse 1\nzebrafish 2 1\n";
        let m = parse_matrix_text(text).unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
    }

    #[test]
    fn test_phylip_numeric_labels() {
        let text = "3\n9606 0 1 2\n10090 1 0 1\n7955 2 1 0\n";
        let m = parse_matrix_text(text).unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
        assert_eq!(m.labels, vec!["9606", "10090", "7955"]);
    }

    #[test]
    fn test_phylip_numeric_labels_lower_triangle() {
        let m = parse_matrix_text("3\n1 0\n2 1 0\n3 2 1 0\n").unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
        assert_eq!(m.labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_unlabelled_lower_triangle() {
        let m = parse_matrix_text("0\n1 0\n2 1 0\n").unwrap();
        assert_eq!(m.flatten(), expected().as_slice());
        assert!(m.labels.is_empty());
    }

    #[test]
    fn test_non_finite_names_are_labels() {
        let m = parse_matrix_text("nan 0\ninf 1 0\n").unwrap();
        assert_eq!(m.labels, vec!["nan", "inf"]);
        assert_eq!(m.get(1, 0), Some(1.0));
    }

    #[test]
    fn test_declared_count_mismatch() {
        let result = parse_matrix_text("4\na 0 1\nb 1 0\n");
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_ragged_rows() {
        let result = parse_matrix_text("0 1 2\n1 0\n2 1 0 4\n");
        assert!(matches!(
            result,
            Err(ParseError::Matrix(MatrixError::NotSquare { .. }))
        ));
    }

    #[test]
    fn test_bad_value() {
        let result = parse_matrix_text("0 1\n1 zero\n");
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty() {
        assert!(parse_matrix_text("# only a comment\n\n").is_err());
    }
}
