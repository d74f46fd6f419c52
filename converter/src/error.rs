//! Error types for the conversion pipeline.
//!
//! Row-level problems never surface here: the row normalizer always produces a
//! document and reports questionable input as [`crate::RowWarning`]s. The
//! types below cover the I/O layers around it:
//!
//! - [`CsvError`] - CSV reading and parsing errors
//! - [`ConvertError`] - Per-file conversion errors
//! - [`BatchError`] - Folder-level errors that stop a batch before it starts
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read input.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid CSV format.
    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },

    /// The header row has no named column.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::Io(io),
            _ => CsvError::Parse { line, message },
        }
    }
}

// =============================================================================
// Per-file Conversion Errors
// =============================================================================

/// Errors while converting a single CSV file into a JSON file.
///
/// A `ConvertError` is reported against its file and never aborts the batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source file could not be read.
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Source file is not valid CSV.
    #[error("Cannot parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        source: CsvError,
    },

    /// Documents could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Destination file could not be written.
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The blocking conversion task panicked or was cancelled.
    #[error("Conversion task failed: {0}")]
    Task(String),
}

// =============================================================================
// Batch Errors
// =============================================================================

/// Folder-level errors.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Input directory could not be listed.
    #[error("Cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Output directory could not be created.
    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for single-file conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_error_names_the_file() {
        let err = ConvertError::Csv {
            path: PathBuf::from("input/monsters/skills.csv"),
            source: CsvError::Parse {
                line: 4,
                message: "unterminated quote".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("skills.csv"));
        assert!(msg.contains("Line 4"));
        assert!(msg.contains("unterminated quote"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConvertError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_batch_error_format() {
        let err = BatchError::ReadDir {
            path: PathBuf::from("input/missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("input/missing"));
        assert!(msg.contains("not found"));
    }
}
