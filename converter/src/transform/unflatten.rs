//! Dot-notation reconstruction.
//!
//! ```text
//! {"name": "Goblin", "stats.hp": 10, "stats.mp": 5}
//!                        ↓ unflatten
//! {"name": "Goblin", "stats": {"hp": 10, "mp": 5}}
//! ```
//!
//! Shape conflicts resolve as last write wins. A dotted key descending
//! through an existing leaf replaces it with an object, and a plain key
//! landing on an existing subtree replaces the subtree. Either way the path
//! is reported as a [`KeyConflict`].

use serde_json::{Map, Value};

/// A path where two columns disagreed on the document shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConflict {
    /// Dotted path of the overwritten node.
    pub path: String,
}

/// Output of [`unflatten`].
#[derive(Debug, Clone, Default)]
pub struct Unflattened {
    pub document: Map<String, Value>,
    pub conflicts: Vec<KeyConflict>,
}

/// Rebuild nested objects from dot-separated keys.
///
/// Keys are processed in order; keys without a `.` are copied as-is.
pub fn unflatten(flat: Map<String, Value>) -> Unflattened {
    let mut out = Unflattened::default();

    'keys: for (key, value) in flat {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut node = &mut out.document;
        for (depth, segment) in parents.iter().enumerate() {
            let slot = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
                out.conflicts.push(KeyConflict {
                    path: segments[..=depth].join("."),
                });
            }
            let Some(child) = slot.as_object_mut() else {
                continue 'keys;
            };
            node = child;
        }

        if node.insert(last.to_string(), value).is_some() {
            out.conflicts.push(KeyConflict { path: key.clone() });
        }
    }

    out
}

/// Flatten a nested document back into dotted keys.
///
/// Non-empty objects are descended; scalars, arrays and empty objects are
/// emitted as leaves. `unflatten(flatten(doc))` rebuilds `doc`.
pub fn flatten(document: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(&mut flat, None, document);
    flat
}

fn flatten_into(out: &mut Map<String, Value>, prefix: Option<&str>, node: &Map<String, Value>) {
    for (key, value) in node {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(out, Some(&path), child),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}
