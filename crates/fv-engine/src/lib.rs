//! # fv-engine
//!
//! Request processing for the fuzz value engine.
//!
//! ## Features
//!
//! - **Processor lifecycle**: build, continue, persist, load and delete
//! - **Pluggable storage**: file-per-processor and in-memory backends
//! - **Dispatch**: new vs resumed requests, close requests, tagged JSON envelope
//! - **Configuration**: store location, record format, max values limit
//!
//! ## Example
//!
//! ```rust,ignore
//! use fv_engine::{EngineConfig, FileStore, RequestDispatcher};
//! use fv_heuristics::IntegerKind;
//!
//! let config = EngineConfig::default();
//! let dispatcher = RequestDispatcher::new(FileStore::from_config(&config), config);
//!
//! let first = dispatcher.process::<IntegerKind>(Request::new("ports", 3))?;
//! let more = dispatcher.process::<IntegerKind>(
//!     Request::new("ports", 6).with_id(first.id),
//! )?;
//! dispatcher.close(first.id)?;
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod processor;
pub mod record;
pub mod store;

pub use config::EngineConfig;
pub use dispatcher::{RequestDispatcher, WireRequest, WireResponse};
pub use error::{DeleteCause, EngineError, EngineResult, LoadCause, PersistCause, StoreError};
pub use processor::{ProcessorState, RequestProcessor, delete_persisted};
pub use record::ProcessorRecord;
pub use store::{FileStore, MemoryStore, ProcessorStore};
