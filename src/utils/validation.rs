//! Centralized validation and helper functions.

use std::path::Path;

/// Maximum number of hit blocks read from a single report (DOS protection)
pub const MAX_HITS: usize = 1_000_000;

/// Maximum number of rows in a distance matrix (DOS protection)
pub const MAX_MATRIX_SIZE: usize = 10_000;

pub const MAX_FILENAME_LENGTH: usize = 255;

/// Check if reading another hit would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new hit.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_hit_limit(count: usize) -> Option<String> {
    if count >= MAX_HITS {
        Some(format!(
            "Too many hits: adding another would exceed maximum of {MAX_HITS}"
        ))
    } else {
        None
    }
}

/// Check if adding another matrix row would exceed the maximum allowed.
#[must_use]
pub fn check_matrix_limit(count: usize) -> Option<String> {
    if count >= MAX_MATRIX_SIZE {
        Some(format!(
            "Too many matrix rows: adding another would exceed maximum of {MAX_MATRIX_SIZE}"
        ))
    } else {
        None
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path separators or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
}

/// Validate an output file stem (e.g. the `multifasta` in `multifasta1.fa`).
///
/// Stems are joined onto an output directory, so path separators and
/// traversal are rejected rather than sanitized.
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the stem is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains separators, `..`, or
/// control characters.
pub fn validate_file_stem(stem: &str) -> Result<&str, ValidationError> {
    if stem.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if stem.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if stem.contains("..") || stem.contains('/') || stem.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if stem.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_hit_limit() {
        assert!(check_hit_limit(0).is_none());
        assert!(check_hit_limit(MAX_HITS - 1).is_none());
        assert!(check_hit_limit(MAX_HITS).is_some());
    }

    #[test]
    fn test_check_matrix_limit() {
        assert!(check_matrix_limit(10).is_none());
        assert!(check_matrix_limit(MAX_MATRIX_SIZE).is_some());
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("blast1.out.blast.gz")));
        assert!(is_gzipped(Path::new("queries.FA.BGZ")));
        assert!(!is_gzipped(Path::new("queries.fa")));
    }

    #[test]
    fn test_validate_file_stem() {
        assert_eq!(validate_file_stem("multifasta").unwrap(), "multifasta");
        assert_eq!(validate_file_stem("run_01-a").unwrap(), "run_01-a");

        assert!(matches!(
            validate_file_stem(""),
            Err(ValidationError::EmptyFilename)
        ));
        assert!(matches!(
            validate_file_stem("../etc/passwd"),
            Err(ValidationError::InvalidFilename)
        ));
        assert!(matches!(
            validate_file_stem("out\\set"),
            Err(ValidationError::InvalidFilename)
        ));
        assert!(matches!(
            validate_file_stem("name\0"),
            Err(ValidationError::InvalidFilename)
        ));
        assert!(matches!(
            validate_file_stem(&"a".repeat(300)),
            Err(ValidationError::FilenameTooLong)
        ));
    }
}
