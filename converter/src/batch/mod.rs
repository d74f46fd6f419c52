//! Folder conversion.
//!
//! ```text
//! input/<folder>/*.csv ──▶ discover ──▶ convert_file (one future per sheet) ──▶ output/<folder>/*.json
//! ```
//!
//! Sheets are independent: they are converted concurrently, and a sheet that
//! fails is recorded in the [`BatchReport`] while the others carry on.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde::Serialize;

use crate::config::ConvertConfig;
use crate::error::{BatchError, BatchResult, ConvertError, ConvertResult};
use crate::logs::{log_error, log_info, log_success, log_warning, log_warning_indent};
use crate::transform::pipeline::{convert_bytes, RowWarning};

/// Warnings printed per file before the rest are summarized.
const MAX_LOGGED_WARNINGS: usize = 5;

/// A sheet that converted successfully.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub encoding: String,
    pub rows: usize,
    pub warnings: Vec<RowWarning>,
}

/// A sheet that could not be converted.
#[derive(Debug)]
pub struct FailedFile {
    pub source: PathBuf,
    pub error: ConvertError,
}

/// Outcome of a folder conversion, in file-name order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.converted.iter().map(|f| f.rows).sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.converted.iter().map(|f| f.warnings.len()).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} file(s) converted ({} rows, {} warnings), {} failed",
            self.converted.len(),
            self.total_rows(),
            self.total_warnings(),
            self.failed.len()
        )
    }
}

/// Output name for a sheet: the `.csv` suffix becomes `.json`.
pub fn output_file_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    format!("{stem}.json")
}

/// List the sheets to convert in the configured import folder, sorted by
/// file name.
///
/// Only regular files whose name ends in `.csv` are kept; excluded names are
/// skipped.
pub async fn discover_csv_files(config: &ConvertConfig) -> BatchResult<Vec<PathBuf>> {
    let dir = config.import_dir();
    let read_dir_error = |source| BatchError::ReadDir {
        path: dir.clone(),
        source,
    };

    let mut entries = tokio::fs::read_dir(&dir).await.map_err(read_dir_error)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".csv") || config.is_excluded(name) {
            continue;
        }
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Convert one sheet and write its JSON array to `destination`.
pub async fn convert_file(source: &Path, destination: &Path) -> ConvertResult<ConvertedFile> {
    let bytes = tokio::fs::read(source).await.map_err(|e| ConvertError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let (info, result) = tokio::task::spawn_blocking(move || convert_bytes(&bytes))
        .await
        .map_err(|e| ConvertError::Task(e.to_string()))?
        .map_err(|e| ConvertError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;

    if info.headers.is_empty() {
        log_warning(format!("{} is empty, writing []", source.display()));
    }

    let mut json = serde_json::to_string_pretty(&result.documents)?;
    json.push('\n');

    tokio::fs::write(destination, json)
        .await
        .map_err(|e| ConvertError::Write {
            path: destination.to_path_buf(),
            source: e,
        })?;

    Ok(ConvertedFile {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        encoding: info.encoding,
        rows: info.row_count,
        warnings: result.warnings,
    })
}

/// Convert every sheet of the configured folder.
///
/// Fails only when the folder itself cannot be prepared or listed; per-file
/// errors land in the report.
pub async fn convert_folder(config: &ConvertConfig) -> BatchResult<BatchReport> {
    let import_dir = config.import_dir();
    let export_dir = config.export_dir();

    tokio::fs::create_dir_all(&export_dir)
        .await
        .map_err(|e| BatchError::CreateDir {
            path: export_dir.clone(),
            source: e,
        })?;

    let files = discover_csv_files(config).await?;
    if files.is_empty() {
        log_warning(format!("No CSV files found in {}", import_dir.display()));
        return Ok(BatchReport::default());
    }

    log_info(format!(
        "Converting {} file(s) from {}",
        files.len(),
        import_dir.display()
    ));

    let jobs = files.into_iter().map(|source| {
        let name = file_name_of(&source);
        let destination = export_dir.join(output_file_name(&name));
        async move {
            let outcome = convert_file(&source, &destination).await;
            (source, name, outcome)
        }
    });

    let mut report = BatchReport::default();
    for (source, name, outcome) in join_all(jobs).await {
        match outcome {
            Ok(converted) => {
                log_success(format!(
                    "Successfully converted {} to JSON in folder {}",
                    name, config.folder
                ));
                log_row_warnings(&converted.warnings);
                report.converted.push(converted);
            }
            Err(error) => {
                log_error(format!("Error converting {}: {}", name, error));
                report.failed.push(FailedFile { source, error });
            }
        }
    }

    Ok(report)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn log_row_warnings(warnings: &[RowWarning]) {
    for warning in warnings.iter().take(MAX_LOGGED_WARNINGS) {
        log_warning_indent(
            format!("row {}, {}: {}", warning.row + 1, warning.field, warning.message),
            1,
        );
    }
    if warnings.len() > MAX_LOGGED_WARNINGS {
        log_warning_indent(
            format!("... +{} more warnings", warnings.len() - MAX_LOGGED_WARNINGS),
            1,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("monsters.csv"), "monsters.json");
        assert_eq!(output_file_name("a.csv.csv"), "a.csv.json");
        assert_eq!(output_file_name("skills.v2.csv"), "skills.v2.json");
    }

    fn config_in(root: &Path, folder: &str) -> ConvertConfig {
        ConvertConfig::new(folder)
            .with_input_root(root.join("input"))
            .with_output_root(root.join("output"))
    }

    #[tokio::test]
    async fn test_discover_filters_and_sorts() {
        let root = tempfile::tempdir().unwrap();
        let config =
            config_in(root.path(), "world").with_exclusions(vec!["draft.csv".to_string()]);
        let dir = config.import_dir();
        fs::create_dir_all(&dir).unwrap();
        for name in ["b.csv", "a.csv", "daemons.csv", "draft.csv", "notes.txt", "UPPER.CSV"] {
            fs::write(dir.join(name), "x\n1\n").unwrap();
        }
        fs::create_dir(dir.join("nested.csv")).unwrap();

        let files = discover_csv_files(&config).await.unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name_of(p)).collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[tokio::test]
    async fn test_discover_missing_dir_is_error() {
        let root = tempfile::tempdir().unwrap();
        let result = discover_csv_files(&config_in(root.path(), "missing")).await;
        assert!(matches!(result, Err(BatchError::ReadDir { .. })));
    }

    #[tokio::test]
    async fn test_convert_file_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("spells.csv");
        let destination = dir.path().join("spells.json");
        fs::write(&source, "name,damage,type\nAgi,5,fire\n").unwrap();

        let converted = convert_file(&source, &destination).await.unwrap();
        assert_eq!(converted.rows, 1);
        assert!(converted.warnings.is_empty());

        let written = fs::read_to_string(&destination).unwrap();
        let expected = "[\n  {\n    \"name\": \"Agi\",\n    \"damage\": {\n      \"value\": 5,\n      \"type\": \"fire\"\n    },\n    \"description\": \"\"\n  }\n]\n";
        assert_eq!(written, expected);
    }

    #[tokio::test]
    async fn test_convert_file_reports_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(&dir.path().join("nope.csv"), &dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
    }

    #[tokio::test]
    async fn test_convert_file_empty_sheet_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("blank.csv");
        let destination = dir.path().join("blank.json");
        fs::write(&source, "").unwrap();

        let converted = convert_file(&source, &destination).await.unwrap();
        assert_eq!(converted.rows, 0);
        assert_eq!(fs::read_to_string(&destination).unwrap(), "[]\n");
    }
}
