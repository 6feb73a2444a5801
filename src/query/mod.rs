//! Query subsystem: condition parsing and view transforms
//!
//! Everything here operates on the working view only; the canonical
//! dataset is never touched by a filter, sort or projection.

mod condition;
mod filter;
mod project;
mod sorter;

pub use condition::{CompareOp, Condition, SubCondition};
pub use filter::ViewFilter;
pub use project::Projector;
pub use sorter::{SortDirection, ViewSorter};
