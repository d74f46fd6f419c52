//! Row conversion pipeline.
//!
//! Ties the transformation steps together for one file:
//!
//! ```text
//! RawRecord ─▶ coerce ─▶ unflatten ─▶ Tags ─▶ Aptitudes ─▶ Damage ─▶ Description ─▶ document
//! ```
//!
//! # Example
//!
//! ```rust
//! use csv2json::convert_records;
//! use serde_json::json;
//!
//! let headers = vec!["name".to_string(), "stats.hp".to_string()];
//! let rows = vec![vec![
//!     ("name".to_string(), "Goblin".to_string()),
//!     ("stats.hp".to_string(), "10".to_string()),
//! ]];
//!
//! let result = convert_records(&headers, &rows);
//! assert_eq!(
//!     result.documents[0],
//!     json!({"name": "Goblin", "stats": {"hp": 10}, "description": ""})
//! );
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::coerce_record;
use super::rules::{Finding, Rule, RuleContext, WarningKind};
use super::unflatten::unflatten;
use crate::error::CsvResult;
use crate::models::{AptitudeTable, RawRecord};
use crate::parser::parse_bytes_auto;

/// Normalizes rows of one file.
///
/// Holds the per-file context: whether a `tags` column exists and the
/// aptitude defaults. Rows never share state, so one normalizer can be used
/// for any number of rows in any order.
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    has_tags_column: bool,
    aptitudes: AptitudeTable,
}

/// One normalized row plus what was found on the way.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub document: Value,
    pub findings: Vec<Finding>,
}

impl RowNormalizer {
    /// Normalizer for a file with the given header row.
    pub fn new(headers: &[String]) -> Self {
        Self::with_aptitudes(headers, AptitudeTable::standard())
    }

    /// Normalizer with a custom aptitude table.
    pub fn with_aptitudes(headers: &[String], aptitudes: AptitudeTable) -> Self {
        Self {
            has_tags_column: RuleContext::has_tags_column(headers),
            aptitudes,
        }
    }

    pub fn aptitudes(&self) -> &AptitudeTable {
        &self.aptitudes
    }

    /// Coerce and normalize a raw CSV row.
    pub fn normalize(&self, record: &RawRecord) -> NormalizedRow {
        self.normalize_coerced(coerce_record(record))
    }

    /// Normalize a row whose values are already typed.
    ///
    /// Keys may still be dotted; this is the entry point for re-normalizing
    /// the [`flatten`](super::unflatten::flatten)ed form of a document.
    pub fn normalize_coerced(&self, coerced: Map<String, Value>) -> NormalizedRow {
        let unflattened = unflatten(coerced);
        let mut document = unflattened.document;

        let mut findings: Vec<Finding> = unflattened
            .conflicts
            .into_iter()
            .map(|c| {
                Finding::new(
                    c.path,
                    WarningKind::StructuralKeyConflict,
                    "columns disagree on the shape of this path, last column wins",
                )
            })
            .collect();

        let ctx = RuleContext::new(self.has_tags_column, &self.aptitudes);
        for rule in Rule::ordered() {
            findings.extend(rule.run(&mut document, &ctx));
        }

        NormalizedRow {
            document: Value::Object(document),
            findings,
        }
    }
}

/// A finding tied to its row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    /// Zero-based data row index.
    pub row: usize,
    pub field: String,
    pub kind: WarningKind,
    pub message: String,
}

/// Result of converting all rows of one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionResult {
    /// One document per input row, in input order.
    pub documents: Vec<Value>,
    /// Recoverable problems, in row order.
    pub warnings: Vec<RowWarning>,
}

impl ConversionResult {
    /// Check if every row converted without warnings
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "Converted: {} rows, {} warnings",
            self.documents.len(),
            self.warnings.len()
        )
    }
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Convert parsed rows into normalized documents.
///
/// Row order is preserved; every row yields exactly one document.
pub fn convert_records(headers: &[String], records: &[RawRecord]) -> ConversionResult {
    let normalizer = RowNormalizer::new(headers);
    let mut result = ConversionResult::default();

    for (row, record) in records.iter().enumerate() {
        let normalized = normalizer.normalize(record);
        result
            .warnings
            .extend(normalized.findings.into_iter().map(|f| RowWarning {
                row,
                field: f.field,
                kind: f.kind,
                message: f.message,
            }));
        result.documents.push(normalized.document);
    }

    result
}

/// Normalize a single raw row against its file's headers.
pub fn normalize_row(record: &RawRecord, headers: &[String]) -> Value {
    RowNormalizer::new(headers).normalize(record).document
}

/// Decode, parse and convert raw CSV bytes.
pub fn convert_bytes(bytes: &[u8]) -> CsvResult<(CsvInfo, ConversionResult)> {
    let parsed = parse_bytes_auto(bytes)?;
    let result = convert_records(&parsed.headers, &parsed.records);
    let info = CsvInfo {
        encoding: parsed.encoding,
        row_count: parsed.records.len(),
        headers: parsed.headers,
    };
    Ok((info, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::unflatten::flatten;
    use serde_json::json;

    fn row(cells: &[(&str, &str)]) -> RawRecord {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    fn aptitudes_with(key: &str, value: i64) -> Value {
        let mut map = AptitudeTable::standard().merged(None);
        map.insert(key.to_string(), json!(value));
        Value::Object(map)
    }

    #[test]
    fn test_goblin_end_to_end() {
        let headers = headers(&[
            "name", "stats.hp", "stats.mp", "aptitudes", "damage", "type", "description",
        ]);
        let record = row(&[
            ("name", "Goblin"),
            ("stats.hp", "10"),
            ("stats.mp", "5"),
            ("aptitudes", "W-2"),
            ("damage", "3"),
            ("type", "slash"),
            ("description", ""),
        ]);

        let result = convert_records(&headers, &[record]);
        assert_eq!(result.documents.len(), 1);
        assert!(result.is_clean());

        let doc = &result.documents[0];
        assert_eq!(
            *doc,
            json!({
                "name": "Goblin",
                "stats": {"hp": 10, "mp": 5},
                "aptitudes": aptitudes_with("w", 2),
                "damage": {"value": 3, "type": "slash"},
                "description": ""
            })
        );
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "stats", "aptitudes", "damage", "description"]);
    }

    #[test]
    fn test_tags_column_without_value() {
        let doc = normalize_row(&row(&[("name", "Imp"), ("tags", "")]), &headers(&["name", "tags"]));
        assert_eq!(doc["tags"], json!([]));
    }

    #[test]
    fn test_no_tags_column_means_no_tags_key() {
        let doc = normalize_row(&row(&[("name", "Imp")]), &headers(&["name"]));
        assert!(doc.get("tags").is_none());
    }

    #[test]
    fn test_tags_from_typed_row() {
        let normalizer = RowNormalizer::new(&headers(&["tags"]));
        let mut coerced = Map::new();
        coerced.insert("tags".into(), json!([{"id": "x"}, {"foo": 1}, null]));
        let normalized = normalizer.normalize_coerced(coerced);
        assert_eq!(normalized.document["tags"], json!([{"id": "x"}]));
    }

    #[test]
    fn test_dotted_damage_column_becomes_zero() {
        let result = convert_records(
            &headers(&["damage.min", "damage.max"]),
            &[row(&[("damage.min", "1"), ("damage.max", "4")])],
        );
        assert_eq!(result.documents[0]["damage"], json!({"value": 0, "type": "unknown"}));
        assert_eq!(result.warnings[0].kind, WarningKind::MalformedDamageValue);
    }

    #[test]
    fn test_warnings_carry_row_index() {
        let result = convert_records(
            &headers(&["aptitudes"]),
            &[row(&[("aptitudes", "F-1")]), row(&[("aptitudes", "F-x")])],
        );
        assert_eq!(result.documents.len(), 2);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].row, 1);
        assert_eq!(result.warnings[0].kind, WarningKind::MalformedAptitudeOverride);
        assert_eq!(result.summary(), "Converted: 2 rows, 1 warnings");
    }

    #[test]
    fn test_key_conflict_is_reported_not_fatal() {
        let result = convert_records(
            &headers(&["stats", "stats.hp"]),
            &[row(&[("stats", "7"), ("stats.hp", "10")])],
        );
        assert_eq!(result.documents[0]["stats"], json!({"hp": 10}));
        assert_eq!(result.warnings[0].kind, WarningKind::StructuralKeyConflict);
        assert_eq!(result.warnings[0].field, "stats");
    }

    #[test]
    fn test_renormalizing_flattened_document_is_stable() {
        let headers = headers(&["name", "stats.hp", "stats.mp", "tags", "description"]);
        let normalizer = RowNormalizer::new(&headers);
        let first = normalizer
            .normalize(&row(&[
                ("name", "Slime"),
                ("stats.hp", "4"),
                ("stats.mp", "0"),
                ("tags", ""),
                ("description", "Bouncy"),
            ]))
            .document;

        let flat = flatten(first.as_object().unwrap());
        let flat_headers: Vec<String> = flat.keys().cloned().collect();
        let second = RowNormalizer::new(&flat_headers).normalize_coerced(flat).document;
        assert_eq!(first, second);
    }

    #[test]
    fn test_convert_bytes() {
        let csv = "name,damage,type\nBolt,9,elec\nGust,,wind\n";
        let (info, result) = convert_bytes(csv.as_bytes()).unwrap();
        assert_eq!(info.row_count, 2);
        assert_eq!(info.headers, vec!["name", "damage", "type"]);
        assert_eq!(result.documents[0]["damage"], json!({"value": 9, "type": "elec"}));
        assert_eq!(result.documents[1]["damage"], json!({"value": 0, "type": "wind"}));
    }

    #[test]
    fn test_empty_sheet_converts_to_no_documents() {
        for bytes in [&b""[..], "\u{feff}".as_bytes()] {
            let (info, result) = convert_bytes(bytes).unwrap();
            assert!(info.headers.is_empty());
            assert_eq!(info.row_count, 0);
            assert!(result.documents.is_empty());
            assert!(result.is_clean());
        }
    }
}
