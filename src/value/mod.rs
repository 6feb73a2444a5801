//! Value-level primitives shared by every engine stage
//!
//! Records are `serde_json::Value` objects with order-preserving maps.
//! This module holds the three operations everything else is built on:
//!
//! - loose comparison (numeric when both sides read as numbers,
//!   lexicographic otherwise)
//! - dot-notation path resolution into nested records
//! - canonical key ordering (alphabetical, `id` pinned first)

mod compare;
mod normalize;
mod path;

pub use compare::{as_number, as_text, compare, compare_with_operand, loose_eq, records_equal};
pub use normalize::{normalize_dataset, normalize_value, ID_FIELD};
pub use path::resolve;
