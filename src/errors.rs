//! Engine error codes and the per-chain error collector
//!
//! Stage failures are not propagated as `Result`s through the chain. Each
//! stage appends a short code to the collector and leaves the engine
//! chainable; `run` is the single point where accumulated codes surface.

use std::fmt;

/// Short error codes raised by engine stages.
///
/// The wire form is `NAMESPACE|REASON`, e.g. `QUERY|NODATAFOUND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input did not decode to a JSON array
    JsonInvalid,
    /// A filter or lookup matched no records
    QueryNoDataFound,
    /// Primary key field is not part of the record schema
    KeyNotFound,
    /// Primary key field holds non-integer values
    KeyInvalid,
    /// A non-integer value was encountered while computing the next key
    KeyInvalidValue,
    /// Ordering requested on an empty view
    OrderNoData,
    /// Order column missing from one or more records
    OrderInvalidColumn,
    /// Range did not contain exactly two bounds
    BetweenInvalidRange,
    /// Range field missing from one or more records
    BetweenInvalidKey,
    /// No records fell within the range
    BetweenNotFound,
    /// Dataset holds no records
    DataEmpty,
    /// Insert payload carries keys outside the record schema
    InsertExtraKey,
    /// Update executed against an empty view
    UpdateNotFound,
    /// Delete executed against an empty view
    DeleteNotFound,
    /// Dataset could not be written back to its source file
    FileSaveError,
}

impl ErrorCode {
    /// Returns the wire-format shortcode.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::JsonInvalid => "JSON|INVALID",
            ErrorCode::QueryNoDataFound => "QUERY|NODATAFOUND",
            ErrorCode::KeyNotFound => "KEY|NOTFOUND",
            ErrorCode::KeyInvalid => "KEY|INVALID",
            ErrorCode::KeyInvalidValue => "KEY|INVALIDVALUE",
            ErrorCode::OrderNoData => "ORDER|NODATA",
            ErrorCode::OrderInvalidColumn => "ORDER|INVALIDCOLUMN",
            ErrorCode::BetweenInvalidRange => "BETWEEN|INVALIDRANGE",
            ErrorCode::BetweenInvalidKey => "BETWEEN|INVALIDKEY",
            ErrorCode::BetweenNotFound => "BETWEEN|NOTFOUND",
            ErrorCode::DataEmpty => "DATA|EMPTY",
            ErrorCode::InsertExtraKey => "INSERT|EXTRAKEY",
            ErrorCode::UpdateNotFound => "UPDATE|NOTFOUND",
            ErrorCode::DeleteNotFound => "DELETE|NOTFOUND",
            ErrorCode::FileSaveError => "FILE|SAVEERROR",
        }
    }

    /// Returns the human-readable message for this code.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::JsonInvalid => "Input did not decode to a JSON array of records",
            ErrorCode::QueryNoDataFound => "No records matched the query",
            ErrorCode::KeyNotFound => "Primary key field does not exist in the record schema",
            ErrorCode::KeyInvalid => "Primary key field holds non-integer values",
            ErrorCode::KeyInvalidValue => "Encountered a non-integer primary key value",
            ErrorCode::OrderNoData => "Cannot order an empty result set",
            ErrorCode::OrderInvalidColumn => "Order column is missing from one or more records",
            ErrorCode::BetweenInvalidRange => "Range must contain exactly two bounds",
            ErrorCode::BetweenInvalidKey => "Range field is missing from one or more records",
            ErrorCode::BetweenNotFound => "No records fell within the requested range",
            ErrorCode::DataEmpty => "Dataset holds no records",
            ErrorCode::InsertExtraKey => "Insert payload contains keys outside the record schema",
            ErrorCode::UpdateNotFound => "No records were selected for update",
            ErrorCode::DeleteNotFound => "No records were selected for deletion",
            ErrorCode::FileSaveError => "Failed to write the dataset back to its source file",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A collected error: the code plus optional context such as the offending
/// column name or the rejected payload keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub code: ErrorCode,
    pub detail: Option<String>,
}

impl ErrorEntry {
    /// Creates an entry with no context detail.
    pub fn new(code: ErrorCode) -> Self {
        Self { code, detail: None }
    }

    /// Creates an entry carrying context detail.
    pub fn with_detail(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }

    /// Returns the shortcode, with detail appended as `CODE: detail`.
    pub fn shortcode(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}: {}", self.code.code(), detail),
            None => self.code.code().to_string(),
        }
    }

    /// Returns the message, with detail appended in parentheses.
    pub fn message(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} ({})", self.code.message(), detail),
            None => self.code.message().to_string(),
        }
    }
}

impl From<ErrorCode> for ErrorEntry {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shortcode())
    }
}

/// Append-only error log for the lifetime of one chain.
///
/// Filled by any stage between `load` and the next completed `run`, drained
/// when `run` renders a report or completes a mutation.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    entries: Vec<ErrorEntry>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: impl Into<ErrorEntry>) {
        self.entries.push(entry.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the collected entries in arrival order.
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Removes and returns all entries, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<ErrorEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
