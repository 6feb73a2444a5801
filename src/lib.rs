//! breezedb - an embedded, file-backed JSON document query engine
//!
//! Loads a JSON array of records from a file or raw text, chains filter,
//! sort and projection calls over an in-memory working view, and applies
//! at most one deferred insert/update/delete per execution. File-backed
//! datasets are written back wholesale when a mutation runs.
//!
//! ```
//! use breezedb::{Breeze, OutputFormat};
//!
//! let mut db = Breeze::new();
//! let result = db
//!     .load(r#"[{"id": 1, "name": "Derry"}, {"id": 2, "name": "Bangor"}]"#)
//!     .where_(&[("name", "%der")])
//!     .run(OutputFormat::Array);
//! assert!(result.is_ok());
//! ```

pub mod engine;
pub mod errors;
pub mod query;
pub mod report;
pub mod store;
pub mod value;

pub use engine::{Breeze, InsertPlanner, MutationIntent, OutputFormat, RunSuccess};
pub use errors::{ErrorCode, ErrorCollector, ErrorEntry};
pub use query::{CompareOp, Condition, SortDirection};
pub use report::{Environment, ErrorReport, LoggedError, Reporter, ReporterConfig};
