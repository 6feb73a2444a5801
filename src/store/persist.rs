//! Dataset persistence
//!
//! Writes the canonical dataset back to its source file as pretty-printed
//! JSON. The write replaces the file wholesale with no backup and no
//! atomic rename, so the store assumes a single writer per file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Failures while serializing or writing the dataset.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes datasets back to their source file.
pub struct DatasetWriter;

impl DatasetWriter {
    /// Overwrites `path` with the pretty-printed dataset.
    pub fn save(path: &Path, records: &[Value]) -> Result<(), PersistError> {
        let text = serde_json::to_string_pretty(records)?;
        fs::write(path, text).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(records = records.len(), path = %path.display(), "dataset persisted");
        Ok(())
    }
}
