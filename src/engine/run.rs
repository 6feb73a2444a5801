//! Chain execution
//!
//! `run` is the single point where a chain produces output: collected
//! errors surface first, then at most one pending mutation is applied to
//! the dataset, and otherwise the current view is shaped into a result
//! envelope. Mutations reset the chain; plain queries leave it intact.

use serde_json::{json, Value};

use super::{Breeze, MutationIntent};
use crate::errors::ErrorCode;
use crate::report::{timestamp, ErrorReport, Reporter};
use crate::store::DatasetWriter;
use crate::value::{normalize_dataset, records_equal};

/// Output encodings for a non-mutating `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Success envelope as pretty JSON text
    #[default]
    Json,
    /// Success envelope as a structured value
    Array,
    /// The unfiltered canonical dataset as a structured value
    Raw,
}

/// Successful outcome of `run`.
#[derive(Debug, Clone, PartialEq)]
pub enum RunSuccess {
    /// Pretty JSON text: the query envelope, or the dataset after a
    /// mutation on a text-backed store
    Json(String),
    /// Structured value: the query envelope, or the raw dataset
    Value(Value),
    /// Persistence outcome of a file-backed mutation, or `false` for a
    /// delete that removed nothing on a text-backed store
    Persisted(bool),
}

impl RunSuccess {
    /// The structured value, when this outcome carries one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            RunSuccess::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl Breeze {
    /// Executes the chain.
    ///
    /// Any code collected since the last `run` short-circuits into an
    /// error report; the pending mutation (if any) stays pending. A
    /// mutation that applies cleanly resets the chain and, for
    /// file-backed datasets, persists the new state.
    pub fn run(&mut self, format: OutputFormat) -> Result<RunSuccess, ErrorReport> {
        if !self.errors.is_empty() {
            return Err(self.report());
        }

        match std::mem::take(&mut self.intent) {
            MutationIntent::Insert(payload) => {
                tracing::debug!("applying insert");
                self.dataset.push(payload);
                self.reset_chain();
                Ok(self.finalize(true))
            }
            MutationIntent::Update(patch) => {
                if self.view.is_empty() {
                    self.intent = MutationIntent::Update(patch);
                    self.errors.push(ErrorCode::UpdateNotFound);
                    return Err(self.report());
                }
                tracing::debug!(matched = self.view.len(), "applying update");
                self.apply_update(&patch);
                self.reset_chain();
                Ok(self.finalize(true))
            }
            MutationIntent::Delete => {
                if self.view.is_empty() {
                    self.intent = MutationIntent::Delete;
                    self.errors.push(ErrorCode::DeleteNotFound);
                    return Err(self.report());
                }
                let removed = self.apply_delete();
                tracing::debug!(removed, "applying delete");
                self.reset_chain();
                Ok(self.finalize(removed))
            }
            MutationIntent::None => {
                if self.view.is_empty() {
                    self.errors.push(ErrorCode::QueryNoDataFound);
                    return Err(self.report());
                }
                Ok(self.query_result(format))
            }
        }
    }

    /// Merges patch fields into every dataset record structurally equal
    /// to a view record. Duplicate identical records are all patched
    /// together; matching is by whole-record equality, not identity.
    fn apply_update(&mut self, patch: &serde_json::Map<String, Value>) {
        let matched = self.view.clone();
        for record in &mut self.dataset {
            if matched.iter().any(|m| records_equal(record, m)) {
                if let Some(fields) = record.as_object_mut() {
                    for (key, value) in patch {
                        fields.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }

    /// Removes every dataset record structurally equal to a view record.
    /// Returns whether the dataset shrank.
    fn apply_delete(&mut self) -> bool {
        let matched = std::mem::take(&mut self.view);
        let before = self.dataset.len();
        self.dataset
            .retain(|record| !matched.iter().any(|m| records_equal(record, m)));
        self.dataset.len() < before
    }

    /// Shapes the view into the requested result format. No state reset.
    fn query_result(&self, format: OutputFormat) -> RunSuccess {
        match format {
            OutputFormat::Raw => RunSuccess::Value(Value::Array(self.dataset.clone())),
            OutputFormat::Array => RunSuccess::Value(self.envelope()),
            OutputFormat::Json => RunSuccess::Json(
                serde_json::to_string_pretty(&self.envelope())
                    .expect("envelope serialization cannot fail"),
            ),
        }
    }

    fn envelope(&self) -> Value {
        json!({
            "status": "success",
            "result": self.view,
            "timestamp": timestamp(),
        })
    }

    /// Settles a completed mutation: file-backed datasets are normalized
    /// and written back, text-backed datasets are returned serialized.
    fn finalize(&mut self, operation_result: bool) -> RunSuccess {
        if let Some(path) = self.source.clone() {
            normalize_dataset(&mut self.dataset);
            match DatasetWriter::save(&path, &self.dataset) {
                Ok(()) => RunSuccess::Persisted(true),
                Err(err) => {
                    tracing::error!(%err, "persistence failed");
                    self.errors
                        .push(crate::errors::ErrorEntry::with_detail(
                            ErrorCode::FileSaveError,
                            err.to_string(),
                        ));
                    RunSuccess::Persisted(false)
                }
            }
        } else if operation_result {
            RunSuccess::Json(
                serde_json::to_string_pretty(&self.dataset)
                    .expect("dataset serialization cannot fail"),
            )
        } else {
            RunSuccess::Persisted(false)
        }
    }

    /// Drains the collector into a rendered report.
    fn report(&mut self) -> ErrorReport {
        let entries = self.errors.drain();
        tracing::debug!(codes = entries.len(), "rendering error report");
        Reporter::new(self.reporter.clone()).handle(&entries)
    }
}
