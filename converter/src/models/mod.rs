//! Domain models for the game-data conversion pipeline.
//!
//! - [`RawRecord`] - One CSV row, column name to raw cell text
//! - [`AptitudeTable`] - The fixed aptitude keys and their default scores
//! - [`Damage`] - The `{value, type}` damage descriptor

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One parsed CSV row: `(column name, raw cell)` pairs in column order.
///
/// Column names may contain `.` separators describing nested structure.
pub type RawRecord = Vec<(String, String)>;

// =============================================================================
// Aptitudes
// =============================================================================

/// Recognized aptitude keys, in output order.
///
/// Fire, ice, electricity, wind, earth, light, dark, the three physical
/// damage kinds, healing, the four buff targets and assist.
pub const APTITUDE_KEYS: [&str; 16] = [
    "f", "i", "el", "w", "ea", "l", "d", "dp", "dm", "da", "h", "tb", "tt", "tg", "ta", "assist",
];

/// Default aptitude table merged under every parsed override.
///
/// The normalizer owns one table and consults it for every row, so the
/// defaults are explicit data rather than inline literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AptitudeTable {
    entries: Vec<(String, i64)>,
}

impl AptitudeTable {
    /// The 16 recognized keys, all scored 0.
    pub fn standard() -> Self {
        Self::new(APTITUDE_KEYS.iter().map(|k| (k.to_string(), 0)))
    }

    /// Build a table from explicit `(key, default)` entries.
    pub fn new(entries: impl IntoIterator<Item = (String, i64)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Whether `key` is one of the table's keys.
    pub fn is_known(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Table keys in output order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Defaults with `override_entry` laid on top.
    ///
    /// A known key keeps its position; an unknown key is appended.
    pub fn merged(&self, override_entry: Option<(String, i64)>) -> Map<String, Value> {
        let mut map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(*v)))
            .collect();

        if let Some((key, value)) = override_entry {
            map.insert(key, Value::from(value));
        }
        map
    }
}

impl Default for AptitudeTable {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Damage
// =============================================================================

/// Damage type used when the row gives none.
pub const DEFAULT_DAMAGE_TYPE: &str = "unknown";

/// Normalized damage descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub value: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Damage {
    pub fn new(value: i64, kind: impl Into<String>) -> Self {
        Self {
            value,
            kind: kind.into(),
        }
    }

    /// JSON form, `value` before `type`.
    pub fn to_value(&self) -> Value {
        json!({ "value": self.value, "type": self.kind })
    }
}
