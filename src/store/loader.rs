//! Dataset loading
//!
//! `load` accepts either a path to an existing JSON file or raw JSON
//! text. The root must decode to an array; every record is key-normalized
//! before it enters the dataset.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::value::normalize_value;

/// Failures while reading or decoding input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("input did not parse as JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("root value is not an array of records")]
    NotAnArray,
}

/// A decoded, normalized dataset plus its origin.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<Value>,
    /// Set when the input named a file; mutations persist back to it.
    pub source: Option<PathBuf>,
}

/// Reads datasets from files or raw JSON text.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Loads `input`, treating it as a file path when one exists on disk
    /// and as raw JSON text otherwise.
    pub fn load(input: &str) -> Result<LoadedDataset, LoadError> {
        let path = Path::new(input);
        let (text, source) = if path.is_file() {
            let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            (contents, Some(path.to_path_buf()))
        } else {
            (input.to_string(), None)
        };

        let root: Value = serde_json::from_str(&text)?;
        let records = match root {
            Value::Array(records) => records,
            _ => return Err(LoadError::NotAnArray),
        };

        let records: Vec<Value> = records.into_iter().map(normalize_value).collect();
        tracing::debug!(records = records.len(), file_backed = source.is_some(), "dataset loaded");

        Ok(LoadedDataset { records, source })
    }
}
