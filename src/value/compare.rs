//! Loose value comparison
//!
//! One comparator backs `where`, `order`, `between` and `find`: if both
//! sides read as numbers they compare numerically, otherwise both sides
//! compare as strings. The rule is deliberately explicit so chains behave
//! identically whether a record holds `5` or `"5"`.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

/// Numeric reading of a scalar: numbers directly, strings via parse.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Text reading of a value for lexicographic comparison and substring match.
pub fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Three-way comparison under the loose coercion rule.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    as_text(a).as_ref().cmp(as_text(b).as_ref())
}

/// Three-way comparison of a record value against a raw condition operand.
pub fn compare_with_operand(value: &Value, operand: &str) -> Ordering {
    if let (Some(x), Ok(y)) = (as_number(value), operand.trim().parse::<f64>()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    as_text(value).as_ref().cmp(operand)
}

/// Equality under the same coercion rule as [`compare`].
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    compare(a, b) == Ordering::Equal
}

/// Deep structural equality used to match view records against the dataset.
///
/// Objects compare by key set regardless of key order, so a normalized and
/// an unnormalized spelling of the same record are equal. Numbers compare
/// numerically, so `1` and `1.0` are equal. Strings never coerce to numbers
/// here; `"1"` and `1` are distinct records.
pub fn records_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| records_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| records_equal(x, y)))
        }
        _ => a == b,
    }
}
