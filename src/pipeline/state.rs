//! The append-only state threaded through a pipeline run.

use serde_json::{Map, Value};
use tracing::warn;

/// A partial update produced by one stage: new keys to merge into the state.
pub type Update = Map<String, Value>;

/// Append-only mapping from stage key to the value that stage produced.
///
/// Each pipeline run owns one `State` exclusively. A key, once written, is
/// never overwritten: the first write wins and a later attempt is dropped
/// with a warning. Any stage may read any key written by an earlier stage.
#[derive(Debug, Clone, Default)]
pub struct State {
    values: Map<String, Value>,
}

impl State {
    /// Creates a state seeded with the initial journal text.
    pub fn seeded(journal_text: &str) -> Self {
        let mut values = Map::new();
        values.insert(
            super::keys::JOURNAL_TEXT.to_string(),
            Value::String(journal_text.to_string()),
        );
        State { values }
    }

    /// Returns the value for `key`, if any stage has produced it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns true if `key` has been written.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Merges a stage's partial update, keeping existing keys untouched.
    pub fn merge(&mut self, update: Update) {
        for (key, value) in update {
            if self.values.contains_key(&key) {
                warn!("state key '{}' already written, keeping first value", key);
                continue;
            }
            self.values.insert(key, value);
        }
    }

    /// The top-level value under `key` as a string.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// A string field nested under `key`.
    pub fn str_field(&self, key: &str, field: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.get(field)).and_then(Value::as_str)
    }

    /// A numeric field nested under `key`.
    pub fn f64_field(&self, key: &str, field: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.get(field)).and_then(Value::as_f64)
    }

    /// A string-array field nested under `key`. Missing or malformed entries
    /// yield an empty list; callers treat absence as "nothing detected".
    pub fn string_list(&self, key: &str, field: &str) -> Vec<String> {
        self.get(key)
            .and_then(|v| v.get(field))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
