//! Error types for request processing and persistence

use thiserror::Error;
use uuid::Uuid;

/// Failure of a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a persisted processor could not be restored
#[derive(Error, Debug)]
pub enum LoadCause {
    #[error("no persisted record")]
    NotFound,

    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The record belongs to a processor of another value kind
    #[error("record of {name:?} holds {stored} values, not {requested}")]
    WrongKind {
        stored: String,
        requested: String,
        name: String,
    },

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

/// Why a persisted processor could not be removed
#[derive(Error, Debug)]
pub enum DeleteCause {
    #[error("no persisted record")]
    NotFound,

    #[error("removal failed: {0}")]
    Storage(#[source] StoreError),
}

/// Why a processor could not be persisted
#[derive(Error, Debug)]
pub enum PersistCause {
    #[error("encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

/// Engine errors surfaced to callers
#[derive(Error, Debug)]
pub enum EngineError {
    /// A continuation request does not match the stored processor
    #[error(
        "Request {name:?} ({id:?}) is not a continuation of {expected_name:?} ({expected_id})"
    )]
    InvalidContinuation {
        expected_name: String,
        expected_id: Uuid,
        name: String,
        id: Option<Uuid>,
    },

    #[error("Failed to load processor {id}: {cause}")]
    LoadFailed {
        id: Uuid,
        #[source]
        cause: LoadCause,
    },

    #[error("Failed to delete processor {id}: {cause}")]
    DeleteFailed {
        id: Uuid,
        #[source]
        cause: DeleteCause,
    },

    #[error("Failed to persist processor {id}: {cause}")]
    PersistFailed {
        id: Uuid,
        #[source]
        cause: PersistCause,
    },

    /// Engine configuration could not be read
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub(crate) fn load(id: Uuid, cause: LoadCause) -> Self {
        Self::LoadFailed { id, cause }
    }

    pub(crate) fn delete(id: Uuid, cause: DeleteCause) -> Self {
        Self::DeleteFailed { id, cause }
    }

    pub(crate) fn persist(id: Uuid, cause: PersistCause) -> Self {
        Self::PersistFailed { id, cause }
    }

    /// True for load or delete failures caused by a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LoadFailed {
                cause: LoadCause::NotFound,
                ..
            } | Self::DeleteFailed {
                cause: DeleteCause::NotFound,
                ..
            }
        )
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
