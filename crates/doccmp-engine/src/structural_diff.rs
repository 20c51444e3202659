//! Structural diff: compare two document records field by field.
//!
//! Only keys present on both sides are compared. Nested objects are walked
//! recursively and reported under dotted paths (`metadata.pageCount`); any
//! other value is compared whole.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use doccmp_types::Difference;

/// Compare two mappings and return one field difference per unequal leaf.
///
/// Keys are visited in sorted order. Keys present in only one mapping are
/// ignored.
pub fn diff_structures(old: &Map<String, Value>, new: &Map<String, Value>) -> Vec<Difference> {
    diff_structures_ignoring(old, new, &[])
}

/// Like [`diff_structures`], skipping the listed top-level keys.
pub fn diff_structures_ignoring(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    ignored: &[String],
) -> Vec<Difference> {
    let mut changes = Vec::new();
    walk(old, new, "", ignored, &mut changes);
    changes
}

fn walk(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    prefix: &str,
    ignored: &[String],
    changes: &mut Vec<Difference>,
) {
    let shared: BTreeSet<&String> = old.keys().filter(|k| new.contains_key(*k)).collect();

    for key in shared {
        if prefix.is_empty() && ignored.contains(key) {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match (&old[key], &new[key]) {
            (Value::Object(old_map), Value::Object(new_map)) => {
                walk(old_map, new_map, &path, &[], changes);
            }
            (old_val, new_val) if old_val != new_val => {
                changes.push(Difference::Field {
                    field: path,
                    doc1_value: old_val.clone(),
                    doc2_value: new_val.clone(),
                });
            }
            _ => {}
        }
    }
}
