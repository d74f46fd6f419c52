//! Field normalization rules.
//!
//! After dot-notation reconstruction, every document runs through the same
//! ordered rule list. Each rule declares when it fires and what it rewrites;
//! later rules see the output of earlier ones.
//!
//! | Rule          | Fires when                          | Rewrites                         |
//! |---------------|-------------------------------------|----------------------------------|
//! | `Tags`        | the file has a `tags` column        | `tags` → objects with string ids |
//! | `Aptitudes`   | `aptitudes` key present             | `aptitudes` → full score table   |
//! | `Damage`      | `damage` or `type` key present      | `damage` → `{value, type}`       |
//! | `Description` | `description` absent or falsy       | `description` → `""`             |

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{AptitudeTable, Damage, DEFAULT_DAMAGE_TYPE};

/// Category of a recoverable problem found while normalizing a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Two columns implied different shapes for the same path.
    StructuralKeyConflict,
    /// The score part of an `aptitudes` override is not an integer.
    MalformedAptitudeOverride,
    /// The `aptitudes` override names a key outside the table.
    UnknownAptitudeKey,
    /// A non-empty `damage` value is not an integer.
    MalformedDamageValue,
}

/// A recoverable problem in one field; the row still converts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub field: String,
    pub kind: WarningKind,
    pub message: String,
}

impl Finding {
    pub fn new(field: impl Into<String>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Per-file inputs shared by every row.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Whether the source header row has a column named exactly `tags`.
    pub has_tags_column: bool,
    /// Default aptitude scores.
    pub aptitudes: &'a AptitudeTable,
}

impl<'a> RuleContext<'a> {
    pub fn new(has_tags_column: bool, aptitudes: &'a AptitudeTable) -> Self {
        Self {
            has_tags_column,
            aptitudes,
        }
    }

    /// Whether a header row has a column named exactly `tags`.
    pub fn has_tags_column(headers: &[String]) -> bool {
        headers.iter().any(|h| h == "tags")
    }
}

/// A named normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Tags,
    Aptitudes,
    Damage,
    Description,
}

impl Rule {
    const ORDER: [Rule; 4] = [Rule::Tags, Rule::Aptitudes, Rule::Damage, Rule::Description];

    /// Rules in the order they must run.
    pub fn ordered() -> &'static [Rule] {
        &Self::ORDER
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rule::Tags => "tags",
            Rule::Aptitudes => "aptitudes",
            Rule::Damage => "damage",
            Rule::Description => "description",
        }
    }

    /// Whether this rule fires for `doc`.
    pub fn is_triggered(&self, doc: &Map<String, Value>, ctx: &RuleContext<'_>) -> bool {
        match self {
            Rule::Tags => ctx.has_tags_column,
            Rule::Aptitudes => doc.contains_key("aptitudes"),
            Rule::Damage => doc.contains_key("damage") || doc.contains_key("type"),
            Rule::Description => !doc.get("description").is_some_and(is_truthy),
        }
    }

    /// Apply the rule to `doc` if it fires, returning any findings.
    pub fn run(&self, doc: &mut Map<String, Value>, ctx: &RuleContext<'_>) -> Vec<Finding> {
        if !self.is_triggered(doc, ctx) {
            return Vec::new();
        }
        match self {
            Rule::Tags => {
                apply_tags(doc);
                Vec::new()
            }
            Rule::Aptitudes => apply_aptitudes(doc, ctx.aptitudes),
            Rule::Damage => apply_damage(doc),
            Rule::Description => {
                doc.insert("description".to_string(), Value::String(String::new()));
                Vec::new()
            }
        }
    }
}

fn apply_tags(doc: &mut Map<String, Value>) {
    match doc.get_mut("tags") {
        Some(Value::Array(items)) => items.retain(is_tag),
        _ => {
            doc.insert("tags".to_string(), Value::Array(Vec::new()));
        }
    }
}

fn is_tag(item: &Value) -> bool {
    item.as_object()
        .and_then(|tag| tag.get("id"))
        .is_some_and(Value::is_string)
}

fn apply_aptitudes(doc: &mut Map<String, Value>, table: &AptitudeTable) -> Vec<Finding> {
    let mut findings = Vec::new();

    // Only "KEY-VALUE" strings carry an override; every other shape is dropped
    let parsed = match doc.get("aptitudes") {
        Some(Value::String(s)) => s
            .split_once('-')
            .map(|(key, score)| (key.to_lowercase(), score.to_string())),
        _ => None,
    };

    let override_entry = parsed.map(|(key, score)| {
        let value = parse_leading_int(&score).unwrap_or_else(|| {
            findings.push(Finding::new(
                format!("aptitudes.{key}"),
                WarningKind::MalformedAptitudeOverride,
                format!("score '{score}' is not an integer, using 0"),
            ));
            0
        });
        if !table.is_known(&key) {
            findings.push(Finding::new(
                format!("aptitudes.{key}"),
                WarningKind::UnknownAptitudeKey,
                format!("'{key}' is not a recognized aptitude, kept as-is"),
            ));
        }
        (key, value)
    });

    doc.insert(
        "aptitudes".to_string(),
        Value::Object(table.merged(override_entry)),
    );
    findings
}

fn apply_damage(doc: &mut Map<String, Value>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let value = match doc.get("damage") {
        None | Some(Value::Null) => 0,
        Some(Value::String(s)) if s.is_empty() => 0,
        Some(raw) => read_integer(raw).unwrap_or_else(|| {
            findings.push(Finding::new(
                "damage",
                WarningKind::MalformedDamageValue,
                format!("{raw} is not an integer, using 0"),
            ));
            0
        }),
    };

    let kind = match doc.get("type") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) if is_truthy(scalar) => scalar.to_string(),
        _ => DEFAULT_DAMAGE_TYPE.to_string(),
    };

    doc.insert("damage".to_string(), Damage::new(value, kind).to_value());
    doc.shift_remove("type");
    findings
}

/// Truthiness as the source sheets use it: null, false, 0 and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Read a value as an integer the lenient way.
///
/// Numbers truncate toward zero; strings go through [`parse_leading_int`].
/// Everything else is unreadable.
pub fn read_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Parse the leading base-10 integer of `text`.
///
/// Leading whitespace and a sign are accepted and trailing text is ignored,
/// so `"12abc"` reads as 12 and `"3.9"` as 3. `None` when no digits follow,
/// or when the digits overflow `i64`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..sign_len + digits_len].parse().ok()
}
