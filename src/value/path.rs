//! Dot-notation path resolution

use serde_json::Value;

/// Resolves a dot-separated path into a nested record.
///
/// Each segment descends one object level; `"address.town"` reads the
/// `town` field of the `address` object. Returns `None` as soon as any
/// segment is missing or the current value is not an object.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
