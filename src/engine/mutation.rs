//! Pending mutation planning
//!
//! Marking a mutation never touches the dataset; it only records an
//! intent that the next `run` applies. Repeated marking calls replace the
//! previous intent rather than queueing behind it.

use serde_json::{Map, Value};

use crate::errors::{ErrorCode, ErrorEntry};
use crate::value::normalize_value;

/// The single pending mutation applied by the next `run`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MutationIntent {
    #[default]
    None,
    /// Validated, normalized payload ready to append
    Insert(Value),
    /// Fields merged into every matched record
    Update(Map<String, Value>),
    /// Remove every dataset record matched by the view
    Delete,
}

/// Validates and completes insert payloads against the dataset schema.
///
/// The key set of the last dataset record acts as the schema: payload
/// keys outside it are rejected, schema keys missing from the payload are
/// backfilled with null.
pub struct InsertPlanner;

impl InsertPlanner {
    /// Builds the record to append. With `primary_key` given, the field
    /// is validated against the dataset and the payload receives the next
    /// integer value in sequence.
    pub fn plan(
        dataset: &[Value],
        payload: Map<String, Value>,
        primary_key: Option<&str>,
    ) -> Result<Value, ErrorEntry> {
        let schema = dataset
            .last()
            .and_then(Value::as_object)
            .ok_or(ErrorCode::DataEmpty)?;

        let extra: Vec<&str> = payload
            .keys()
            .filter(|key| !schema.contains_key(*key))
            .map(String::as_str)
            .collect();
        if !extra.is_empty() {
            return Err(ErrorEntry::with_detail(
                ErrorCode::InsertExtraKey,
                extra.join(", "),
            ));
        }

        let mut payload = payload;
        for key in schema.keys() {
            if !payload.contains_key(key) {
                payload.insert(key.clone(), Value::Null);
            }
        }

        if let Some(field) = primary_key {
            Self::validate_primary_key(dataset, schema, field)?;
            let next = Self::next_primary_key(dataset, field)?;
            payload.insert(field.to_string(), Value::from(next));
        }

        Ok(normalize_value(Value::Object(payload)))
    }

    /// The field must be part of the schema and hold only integers (null
    /// and absent values are skipped).
    fn validate_primary_key(
        dataset: &[Value],
        schema: &Map<String, Value>,
        field: &str,
    ) -> Result<(), ErrorEntry> {
        if !schema.contains_key(field) {
            return Err(ErrorEntry::with_detail(ErrorCode::KeyNotFound, field));
        }

        for record in dataset {
            if let Some(value) = record.get(field) {
                if !value.is_null() && value.as_i64().is_none() {
                    return Err(ErrorEntry::with_detail(ErrorCode::KeyInvalid, field));
                }
            }
        }
        Ok(())
    }

    /// Max existing value plus one, or 1 when the field is unpopulated.
    fn next_primary_key(dataset: &[Value], field: &str) -> Result<i64, ErrorEntry> {
        let mut max: Option<i64> = None;
        for record in dataset {
            match record.get(field) {
                Some(value) if value.is_null() => {}
                Some(value) => match value.as_i64() {
                    Some(current) => max = Some(max.map_or(current, |m| m.max(current))),
                    None => {
                        return Err(ErrorEntry::with_detail(ErrorCode::KeyInvalidValue, field));
                    }
                },
                None => {}
            }
        }
        Ok(max.map_or(1, |m| m + 1))
    }
}
