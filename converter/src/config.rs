//! Batch configuration.
//!
//! A batch converts every sheet in `<input_root>/<folder>` into
//! `<output_root>/<folder>`. The CLI fills this from arguments, the
//! environment, or a `.env` file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default root holding one sub-folder of CSV sheets per data set.
pub const DEFAULT_INPUT_ROOT: &str = "input";

/// Default root receiving the converted JSON folders.
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// Sheets that are never converted.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &["daemons.csv"];

/// Environment variable naming the folder to convert.
pub const FOLDER_ENV_VAR: &str = "CSV2JSON_FOLDER";

/// Environment variable overriding the input root.
pub const INPUT_ROOT_ENV_VAR: &str = "CSV2JSON_INPUT_ROOT";

/// Environment variable overriding the output root.
pub const OUTPUT_ROOT_ENV_VAR: &str = "CSV2JSON_OUTPUT_ROOT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Data set folder name, shared by the input and output trees
    pub folder: String,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// File names skipped during discovery
    pub exclude: Vec<String>,
}

impl ConvertConfig {
    /// Configuration with default roots and exclusions.
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            exclude: DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_input_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.input_root = root.into();
        self
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Add file names to skip on top of the defaults.
    pub fn with_exclusions(mut self, names: impl IntoIterator<Item = String>) -> Self {
        for name in names {
            if !self.exclude.contains(&name) {
                self.exclude.push(name);
            }
        }
        self
    }

    /// Directory the sheets are read from.
    pub fn import_dir(&self) -> PathBuf {
        self.input_root.join(&self.folder)
    }

    /// Directory the JSON files are written to.
    pub fn export_dir(&self) -> PathBuf {
        self.output_root.join(&self.folder)
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude.iter().any(|name| name == file_name)
    }
}
