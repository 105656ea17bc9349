//! Fuzzed values with provenance

use serde::{Deserialize, Serialize};

/// A produced test datum together with the name of the heuristic that produced it.
///
/// Fields are private so a value cannot be altered after a heuristic yields it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuzzedValue<T> {
    value: T,
    source_name: String,
}

impl<T> FuzzedValue<T> {
    /// Create a value attributed to `source_name`
    pub fn new(value: T, source_name: impl Into<String>) -> Self {
        Self {
            value,
            source_name: source_name.into(),
        }
    }

    /// The produced datum
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Name of the heuristic that produced this value
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Consume the record, keeping only the datum
    pub fn into_value(self) -> T {
        self.value
    }
}
