//! View filtering: `where` evaluation and `between` range checks
//!
//! A record passes `where` when every condition matches (AND across
//! fields); a condition matches when any of its alternatives does (OR
//! within a field). Absent and null values never match.

use serde_json::Value;
use std::cmp::Ordering;

use super::condition::Condition;
use crate::errors::{ErrorCode, ErrorEntry};
use crate::value::{compare, resolve};

/// Evaluates parsed conditions against view records.
pub struct ViewFilter;

impl ViewFilter {
    /// Checks whether a record satisfies all conditions.
    pub fn matches(record: &Value, conditions: &[Condition]) -> bool {
        conditions
            .iter()
            .all(|condition| Self::matches_condition(record, condition))
    }

    fn matches_condition(record: &Value, condition: &Condition) -> bool {
        let value = match resolve(record, &condition.path) {
            Some(value) if !value.is_null() => value,
            _ => return false,
        };
        condition
            .alternatives
            .iter()
            .any(|alternative| alternative.matches(value))
    }

    /// Applies `where`, returning the surviving records.
    pub fn apply(view: &[Value], conditions: &[Condition]) -> Result<Vec<Value>, ErrorEntry> {
        let matched: Vec<Value> = view
            .iter()
            .filter(|record| Self::matches(record, conditions))
            .cloned()
            .collect();

        if matched.is_empty() {
            return Err(ErrorCode::QueryNoDataFound.into());
        }
        Ok(matched)
    }

    /// Applies `between`, keeping records whose `field` falls inside the
    /// inclusive range. Every view record must carry the field.
    pub fn between(view: &[Value], field: &str, range: &[Value]) -> Result<Vec<Value>, ErrorEntry> {
        let [low, high] = range else {
            return Err(ErrorCode::BetweenInvalidRange.into());
        };

        if view
            .iter()
            .any(|record| resolve(record, field).map_or(true, Value::is_null))
        {
            return Err(ErrorEntry::with_detail(ErrorCode::BetweenInvalidKey, field));
        }

        let matched: Vec<Value> = view
            .iter()
            .filter(|record| {
                let value = resolve(record, field).unwrap_or(&Value::Null);
                compare(value, low) != Ordering::Less && compare(value, high) != Ordering::Greater
            })
            .cloned()
            .collect();

        if matched.is_empty() {
            return Err(ErrorCode::BetweenNotFound.into());
        }
        Ok(matched)
    }
}
