//! Error types for range parsing and column extraction.

use thiserror::Error;

/// A malformed range expression.
///
/// Every variant carries the offending atom so the message points at the
/// exact comma-separated segment that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// More than one `-` in a single atom (e.g. `1-2-3`).
    #[error("range '{atom}' has {parts} '-'-separated parts, expected 1 or 2")]
    TooManyParts { atom: String, parts: usize },

    /// A bound that is not an unsigned integer.
    #[error("range '{atom}' has invalid bound '{bound}'")]
    InvalidBound { atom: String, bound: String },
}

/// Errors raised while extracting columns from a CSV stream.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid row filter: {0}")]
    Range(#[from] RangeError),

    #[error("No columns requested")]
    NoColumns,

    #[error("Column '{0}' is not a column index")]
    NotAnIndex(String),

    #[error("There are {names} new names but {columns} columns")]
    RenameCount { names: usize, columns: usize },

    #[error("Input has no header row")]
    MissingHeader,

    #[error("CSV header does not contain {} of {requested} keys: {}", .missing.len(), quoted(.missing))]
    MissingColumns {
        requested: usize,
        missing: Vec<String>,
    },

    #[error("Column {index} is out of range for a header of {width} columns")]
    ColumnOutOfRange { index: usize, width: usize },

    #[error("Bounds error on line {line}: width {width} but column {index} requested")]
    RowTooShort {
        line: usize,
        width: usize,
        index: usize,
    },
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExtractError {
    /// True when the error only means the reader of our output went away.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            ExtractError::Io(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
            ExtractError::Csv(e) => match e.kind() {
                csv::ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::BrokenPipe,
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = ExtractError::MissingColumns {
            requested: 3,
            missing: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"CSV header does not contain 2 of 3 keys: "a", "b""#
        );
    }

    #[test]
    fn test_broken_pipe_detection() {
        let err = ExtractError::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(err.is_broken_pipe());
        assert!(!ExtractError::MissingHeader.is_broken_pipe());
    }

    #[test]
    fn test_range_error_message() {
        let err = RangeError::TooManyParts {
            atom: "1-2-3".to_string(),
            parts: 3,
        };
        assert_eq!(
            err.to_string(),
            "range '1-2-3' has 3 '-'-separated parts, expected 1 or 2"
        );
    }
}
