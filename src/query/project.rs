//! View projection
//!
//! `select` rebuilds each record around the requested paths. The literal
//! path string becomes the output key, so `"address.town"` selects into a
//! flat `"address.town"` field rather than a nested object.

use serde_json::{Map, Value};

use crate::value::resolve;

/// Projects view records onto a set of dot-notation paths.
pub struct Projector;

impl Projector {
    /// Returns the projected view. Paths resolving to nothing (or null)
    /// are omitted from that record.
    pub fn apply(view: &[Value], paths: &[&str]) -> Vec<Value> {
        view.iter()
            .map(|record| {
                let mut projected = Map::with_capacity(paths.len());
                for path in paths {
                    if let Some(value) = resolve(record, path) {
                        if !value.is_null() {
                            projected.insert((*path).to_string(), value.clone());
                        }
                    }
                }
                Value::Object(projected)
            })
            .collect()
    }
}
