//! CSV reading with encoding auto-detection.
//!
//! Sheets are comma-separated with a header row. Each data row becomes a
//! [`RawRecord`] of `(header, cell)` pairs; cells are kept verbatim so type
//! inference happens in one place, the coercer.

use csv::ReaderBuilder;

use crate::error::{CsvError, CsvResult};
use crate::models::RawRecord;

/// Parsed sheet with metadata
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Column headers, in file order
    pub headers: Vec<String>,
    /// Data rows
    pub records: Vec<RawRecord>,
    /// Detected encoding
    pub encoding: String,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 wins outright; otherwise chardet guesses.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Single-byte encodings map every byte, and anything else falls back to
/// lossy UTF-8, so decoding never fails.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Parse comma-separated text into headers and raw records.
///
/// Rows shorter than the header row simply lack the trailing columns; extra
/// cells are ignored. Blank lines are skipped. A sheet with no content at all
/// (only whitespace or a BOM) has no headers and no rows.
///
/// # Example
/// ```
/// use csv2json::parse_csv;
///
/// let (headers, rows) = parse_csv("name,hp\nGoblin,10\n").unwrap();
/// assert_eq!(headers, vec!["name", "hp"]);
/// assert_eq!(rows[0][1], ("hp".to_string(), "10".to_string()));
/// ```
pub fn parse_csv(content: &str) -> CsvResult<(Vec<String>, Vec<RawRecord>)> {
    if content.trim_start_matches('\u{feff}').trim().is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), cell.to_string()))
            .collect();
        records.push(row);
    }

    Ok((headers, records))
}

/// Parse CSV bytes with auto-detection of encoding.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParsedCsv> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let (headers, records) = parse_csv(&content)?;

    Ok(ParsedCsv {
        headers,
        records,
        encoding,
    })
}
