//! # csv2json - game-data sheets to nested JSON
//!
//! Converts the CSV sheets of a game-data set into JSON documents, rebuilding
//! nested objects from dotted column names and normalizing the tag, aptitude,
//! damage and description fields.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  CSV sheet  │────▶│   Parser    │────▶│  Transform   │────▶│  JSON array │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │(coerce+rules)│     │  (2-space)  │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv2json::{convert_folder, ConvertConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let report = convert_folder(&ConvertConfig::new("monsters")).await.unwrap();
//!     println!("{}", report.summary());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (AptitudeTable, Damage, RawRecord)
//! - [`parser`] - CSV parsing with encoding detection
//! - [`transform`] - Coercion, dot-notation and normalization rules
//! - [`batch`] - Folder discovery and concurrent file conversion
//! - [`config`] - Batch configuration
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Folder conversion
pub mod batch;
pub mod config;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{BatchError, ConvertError, CsvError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{AptitudeTable, Damage, RawRecord, APTITUDE_KEYS};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{decode_content, detect_encoding, parse_bytes_auto, parse_csv, ParsedCsv};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    coerce_record, coerce_value, convert_bytes, convert_records, flatten, normalize_row,
    unflatten, ConversionResult, CsvInfo, Finding, NormalizedRow, RowNormalizer, RowWarning,
    Rule, WarningKind,
};

// =============================================================================
// Re-exports - Batch
// =============================================================================

pub use batch::{
    convert_file, convert_folder, discover_csv_files, output_file_name, BatchReport,
    ConvertedFile, FailedFile,
};
pub use config::ConvertConfig;
