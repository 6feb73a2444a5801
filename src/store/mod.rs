//! Document store: dataset loading and file persistence
//!
//! The store reads a JSON array of records from a file or raw text into
//! memory and, for file-backed datasets, writes the whole array back on
//! mutation. There is no partial write, no locking and no recovery; a
//! file belongs to one writer at a time.

mod loader;
mod persist;

pub use loader::{DatasetLoader, LoadError, LoadedDataset};
pub use persist::{DatasetWriter, PersistError};
