//! Key matching and `null` handling compatible with Go's `encoding/json`.
//!
//! Keys match field names case-insensitively, preferring an exact match.
//! A `null` leaves the default in place, except for `Limit`, where it
//! removes the circuit caps.

use serde_json::{Map, Value};

/// Fields where `null` carries meaning instead of being skipped.
const NULLABLE_FIELDS: &[&str] = &["Limit"];

/// Rewrite `raw` to the key spelling used by `template`, dropping `null`s
/// that should leave defaults untouched.
///
/// `template` is the serialized default configuration. Keys with no match
/// are kept as written and ignored during deserialization.
pub(crate) fn canonicalize(raw: Value, template: &Value) -> Value {
    match (raw, template) {
        (Value::Object(fields), Value::Object(known)) => {
            Value::Object(canonicalize_object(fields, known))
        }
        (raw, _) => raw,
    }
}

fn canonicalize_object(fields: Map<String, Value>, known: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    let mut exact = Vec::new();
    for (key, value) in fields {
        if known.contains_key(&key) {
            exact.push((key, value));
            continue;
        }
        match known.keys().find(|name| name.eq_ignore_ascii_case(&key)) {
            Some(name) => insert_field(&mut out, known, name, value),
            None => {
                out.insert(key, value);
            }
        }
    }
    // Exact spellings override case-folded duplicates
    for (key, value) in exact {
        insert_field(&mut out, known, &key, value);
    }
    out
}

fn insert_field(out: &mut Map<String, Value>, known: &Map<String, Value>, name: &str, value: Value) {
    if value.is_null() && !NULLABLE_FIELDS.contains(&name) {
        return;
    }
    let child = known.get(name).unwrap_or(&Value::Null);
    out.insert(name.to_string(), canonicalize(value, child));
}
