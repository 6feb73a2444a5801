//! View ordering
//!
//! Stable three-way sort on a single column. Every record in the view
//! must carry the column; the view is left untouched when any does not.

use serde_json::Value;

use crate::errors::{ErrorCode, ErrorEntry};
use crate::value::{compare, resolve};

/// Sort direction for `order`. Descending when unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sorts view records in place.
pub struct ViewSorter;

impl ViewSorter {
    /// Stable sort by `column`. Equal keys keep their original relative
    /// order in either direction.
    pub fn apply(
        view: &mut [Value],
        column: &str,
        direction: SortDirection,
    ) -> Result<(), ErrorEntry> {
        if view.is_empty() {
            return Err(ErrorCode::OrderNoData.into());
        }

        if view
            .iter()
            .any(|record| resolve(record, column).map_or(true, Value::is_null))
        {
            return Err(ErrorEntry::with_detail(ErrorCode::OrderInvalidColumn, column));
        }

        view.sort_by(|a, b| {
            let left = resolve(a, column).unwrap_or(&Value::Null);
            let right = resolve(b, column).unwrap_or(&Value::Null);
            match direction {
                SortDirection::Asc => compare(left, right),
                SortDirection::Desc => compare(right, left),
            }
        });
        Ok(())
    }
}
