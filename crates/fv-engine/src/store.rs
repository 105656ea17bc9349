//! Key-value storage for persisted processors
//!
//! The engine only needs `put`, `get` and `delete` keyed by processor id.
//! [`FileStore`] keeps one file per processor, [`MemoryStore`] keeps
//! everything in a map for tests and embedded use.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::StoreError;

/// Storage backend for persisted processor records
pub trait ProcessorStore: Send + Sync {
    /// Store `blob` under `id`, replacing any previous record
    fn put(&self, id: &Uuid, blob: &[u8]) -> Result<(), StoreError>;

    /// Fetch the record stored under `id`
    fn get(&self, id: &Uuid) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove the record stored under `id`; `false` if there was none
    fn delete(&self, id: &Uuid) -> Result<bool, StoreError>;
}

impl<S: ProcessorStore + ?Sized> ProcessorStore for &S {
    fn put(&self, id: &Uuid, blob: &[u8]) -> Result<(), StoreError> {
        (**self).put(id, blob)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(id)
    }

    fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        (**self).delete(id)
    }
}

// ============ File Store ============

/// One file per processor: `<dir>/<id>.<extension>`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    extension: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "processor".to_string(),
        }
    }

    /// Store located and named as configured
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.store_dir).with_extension(&config.record_extension)
    }

    /// Builder: set file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `id`
    pub fn path_for(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.{}", id, self.extension))
    }
}

impl ProcessorStore for FileStore {
    fn put(&self, id: &Uuid, blob: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        // Write aside and rename so a crash never leaves a torn record
        let path = self.path_for(id);
        let staging = path.with_extension(format!("{}.tmp", self.extension));
        fs::write(&staging, blob)?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(id)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ============ Memory Store ============

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.records.read().contains_key(id)
    }
}

impl ProcessorStore for MemoryStore {
    fn put(&self, id: &Uuid, blob: &[u8]) -> Result<(), StoreError> {
        self.records.write().insert(*id, blob.to_vec());
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        Ok(self.records.write().remove(id).is_some())
    }
}
