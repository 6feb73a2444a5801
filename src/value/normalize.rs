//! Canonical key ordering for records
//!
//! Every record is stored and persisted with its keys sorted
//! alphabetically, except that an `id` key always sits first. The ordering
//! is applied recursively through nested objects and arrays, and is
//! idempotent.

use serde_json::{Map, Value};

/// Identifier field pinned to the front of every normalized record.
pub const ID_FIELD: &str = "id";

/// Normalizes key order recursively through a value.
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(key, inner)| (key, normalize_value(inner)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut normalized = Map::with_capacity(entries.len());
            if let Some(position) = entries.iter().position(|(key, _)| key == ID_FIELD) {
                let (key, inner) = entries.remove(position);
                normalized.insert(key, inner);
            }
            for (key, inner) in entries {
                normalized.insert(key, inner);
            }
            Value::Object(normalized)
        }
        scalar => scalar,
    }
}

/// Normalizes every record of a dataset in place.
pub fn normalize_dataset(records: &mut Vec<Value>) {
    for record in records.iter_mut() {
        let taken = std::mem::take(record);
        *record = normalize_value(taken);
    }
}
