//! The chainable query engine
//!
//! A `Breeze` instance owns the canonical dataset and a working view.
//! Filter and transform calls narrow or reshape the view; mutation calls
//! record an intent; `run` surfaces collected errors, applies at most one
//! mutation, and shapes the result. Stage failures never abort the chain:
//! they are collected and reported together at `run`.
//!
//! One instance serves one caller at a time. File-backed datasets are
//! rewritten wholesale on mutation, so concurrent writers to the same
//! file must serialize access externally.

mod mutation;
mod run;

pub use mutation::{InsertPlanner, MutationIntent};
pub use run::{OutputFormat, RunSuccess};

use std::path::PathBuf;

use serde_json::Value;

use crate::errors::{ErrorCode, ErrorCollector};
use crate::query::{Condition, Projector, SortDirection, ViewFilter, ViewSorter};
use crate::report::ReporterConfig;
use crate::store::DatasetLoader;
use crate::value::loose_eq;

/// An embedded JSON document query engine over one dataset.
#[derive(Debug, Default)]
pub struct Breeze {
    /// Canonical records, persisted state
    dataset: Vec<Value>,
    /// Working subset/reordering the next operation sees
    view: Vec<Value>,
    /// Set when the dataset came from a file
    source: Option<PathBuf>,
    intent: MutationIntent,
    errors: ErrorCollector,
    reporter: ReporterConfig,
}

impl Breeze {
    /// Creates an engine with default reporter settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with explicit reporter settings.
    pub fn with_config(reporter: ReporterConfig) -> Self {
        Self {
            reporter,
            ..Self::default()
        }
    }

    /// Loads a dataset from a file path or raw JSON text. Replaces any
    /// previously loaded dataset and resets the view to the full dataset.
    pub fn load(&mut self, input: &str) -> &mut Self {
        match DatasetLoader::load(input) {
            Ok(loaded) => {
                self.dataset = loaded.records;
                self.source = loaded.source;
                self.view = self.dataset.clone();
            }
            Err(err) => {
                tracing::debug!(%err, "load rejected");
                self.errors.push(ErrorCode::JsonInvalid);
            }
        }
        self
    }

    /// Filters the view. Each `(path, expression)` pair must match
    /// (AND); `||`-alternatives within one expression are tried in turn
    /// (OR). Paths use dot notation for nested fields.
    pub fn where_(&mut self, conditions: &[(&str, &str)]) -> &mut Self {
        let parsed: Vec<Condition> = conditions
            .iter()
            .map(|(path, expression)| Condition::parse(path, expression))
            .collect();

        match ViewFilter::apply(&self.view, &parsed) {
            Ok(matched) => self.view = matched,
            Err(entry) => self.errors.push(entry),
        }
        self
    }

    /// Stable-sorts the view on `column`.
    pub fn order(&mut self, column: &str, direction: SortDirection) -> &mut Self {
        if let Err(entry) = ViewSorter::apply(&mut self.view, column, direction) {
            self.errors.push(entry);
        }
        self
    }

    /// Keeps view records whose `field` lies inside the inclusive range.
    pub fn between(&mut self, field: &str, range: &[Value]) -> &mut Self {
        match ViewFilter::between(&self.view, field, range) {
            Ok(matched) => self.view = matched,
            Err(entry) => self.errors.push(entry),
        }
        self
    }

    /// Projects each view record onto the given dot-notation paths. An
    /// empty path list is a no-op.
    pub fn select(&mut self, paths: &[&str]) -> &mut Self {
        if !paths.is_empty() {
            self.view = Projector::apply(&self.view, paths);
        }
        self
    }

    /// Scans the full dataset for the first record whose `key` equals
    /// `value` and narrows the view to that record.
    pub fn find(&mut self, key: &str, value: &Value) -> &mut Self {
        let found = self.dataset.iter().find(|record| {
            record
                .get(key)
                .map_or(false, |held| !held.is_null() && loose_eq(held, value))
        });

        match found {
            Some(record) => self.view = vec![record.clone()],
            None => self.errors.push(ErrorCode::QueryNoDataFound),
        }
        self
    }

    /// Truncates the view to its first `count` records.
    pub fn limit(&mut self, count: usize) -> &mut Self {
        self.view.truncate(count);
        self
    }

    /// Marks an insert. The payload is validated against the key set of
    /// the last dataset record; missing schema keys are backfilled with
    /// null. With `primary_key` given, the payload receives the next
    /// integer value for that field.
    pub fn insert(&mut self, payload: Value, primary_key: Option<&str>) -> &mut Self {
        let Value::Object(payload) = payload else {
            self.errors.push(ErrorCode::JsonInvalid);
            return self;
        };

        match InsertPlanner::plan(&self.dataset, payload, primary_key) {
            Ok(planned) => self.intent = MutationIntent::Insert(planned),
            Err(entry) => self.errors.push(entry),
        }
        self
    }

    /// Marks an update merging `patch` fields into every dataset record
    /// matched by the view at `run` time.
    pub fn update(&mut self, patch: Value) -> &mut Self {
        let Value::Object(patch) = patch else {
            self.errors.push(ErrorCode::JsonInvalid);
            return self;
        };
        self.intent = MutationIntent::Update(patch);
        self
    }

    /// Marks deletion of every dataset record matched by the view at
    /// `run` time.
    pub fn delete(&mut self) -> &mut Self {
        self.intent = MutationIntent::Delete;
        self
    }

    /// Number of records currently in the view.
    pub fn count(&self) -> usize {
        self.view.len()
    }

    /// The canonical dataset.
    pub fn dataset(&self) -> &[Value] {
        &self.dataset
    }

    /// The current working view.
    pub fn view(&self) -> &[Value] {
        &self.view
    }

    /// Restores the chain to its post-load shape: full view, no pending
    /// intent, empty error log.
    pub(crate) fn reset_chain(&mut self) {
        self.intent = MutationIntent::None;
        self.view = self.dataset.clone();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOWNS: &str = r#"[
        {"id": 1, "name": "Derry", "population": 90},
        {"id": 2, "name": "Bangor", "population": 60},
        {"id": 3, "name": "Lisburn", "population": 45}
    ]"#;

    #[test]
    fn test_load_sets_view_to_dataset() {
        let mut db = Breeze::new();
        db.load(TOWNS);
        assert_eq!(db.count(), 3);
        assert_eq!(db.dataset(), db.view());
    }

    #[test]
    fn test_load_failure_collects_code_and_chains() {
        let mut db = Breeze::new();
        db.load("{}").where_(&[("id", "1")]);
        assert_eq!(db.count(), 0);
        assert!(!db.errors.is_empty());
    }

    #[test]
    fn test_where_narrows_view_not_dataset() {
        let mut db = Breeze::new();
        db.load(TOWNS).where_(&[("population", ">50")]);
        assert_eq!(db.count(), 2);
        assert_eq!(db.dataset().len(), 3);
    }

    #[test]
    fn test_failed_where_keeps_previous_view() {
        let mut db = Breeze::new();
        db.load(TOWNS).where_(&[("population", ">500")]);
        // last successful state: full view
        assert_eq!(db.count(), 3);
        assert_eq!(db.errors.len(), 1);
    }

    #[test]
    fn test_find_scans_dataset_not_view() {
        let mut db = Breeze::new();
        db.load(TOWNS)
            .where_(&[("id", "1")])
            .find("id", &json!(3));
        assert_eq!(db.count(), 1);
        assert_eq!(db.view()[0]["name"], json!("Lisburn"));
    }

    #[test]
    fn test_find_miss_collects_code() {
        let mut db = Breeze::new();
        db.load(TOWNS).find("id", &json!(99));
        assert_eq!(db.errors.entries()[0].code, ErrorCode::QueryNoDataFound);
        assert_eq!(db.dataset().len(), 3);
    }

    #[test]
    fn test_limit_truncates_view() {
        let mut db = Breeze::new();
        db.load(TOWNS).limit(2);
        assert_eq!(db.count(), 2);

        db.reset_chain();
        db.limit(10);
        assert_eq!(db.count(), 3);
    }

    #[test]
    fn test_select_projects_view() {
        let mut db = Breeze::new();
        db.load(TOWNS).select(&["name"]);
        assert_eq!(db.view()[0], json!({"name": "Derry"}));

        db.reset_chain();
        db.select(&[]);
        assert_eq!(db.view()[0]["population"], json!(90));
    }

    #[test]
    fn test_mutation_marking_replaces_intent() {
        let mut db = Breeze::new();
        db.load(TOWNS).delete().update(json!({"population": 0}));
        assert!(matches!(db.intent, MutationIntent::Update(_)));
    }

    #[test]
    fn test_insert_plans_payload_eagerly() {
        let mut db = Breeze::new();
        db.load(TOWNS).insert(json!({"name": "Armagh"}), Some("id"));
        match &db.intent {
            MutationIntent::Insert(planned) => {
                assert_eq!(planned["id"], json!(4));
                assert_eq!(planned["population"], Value::Null);
            }
            other => panic!("expected insert intent, got {other:?}"),
        }
    }
}
