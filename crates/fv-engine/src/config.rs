//! Engine configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Configuration for request processing and persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Directory holding persisted processors
    pub store_dir: PathBuf,

    /// File extension of persisted processor records
    pub record_extension: String,

    /// Pretty-print persisted records
    pub pretty_records: bool,

    /// Upper limit for `maxValues`; larger requests are clamped
    pub max_values_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            record_extension: "processor".to_string(),
            pretty_records: false,
            max_values_cap: 1_000_000,
        }
    }
}

fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fuzzval")
        .join("processors")
}

impl EngineConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// Builder: set store directory
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// Builder: set record extension
    pub fn with_record_extension(mut self, extension: impl Into<String>) -> Self {
        self.record_extension = extension.into();
        self
    }

    /// Builder: pretty-print records
    pub fn with_pretty_records(mut self, pretty: bool) -> Self {
        self.pretty_records = pretty;
        self
    }

    /// Builder: set max values cap
    pub fn with_max_values_cap(mut self, cap: usize) -> Self {
        self.max_values_cap = cap;
        self
    }
}
