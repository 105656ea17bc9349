//! # fv-core
//!
//! Building blocks of the fuzz value engine.
//!
//! ## Features
//!
//! - **Fuzzed values**: immutable values tagged with the heuristic that produced them
//! - **Heuristics**: lazy, finite, seeded value sources (generators and operators)
//! - **Composition**: strict concatenation of heuristics with a resumable cursor
//! - **Requests & responses**: the typed data model exchanged with callers
//! - **Value kinds**: the per-type capability the generic engine is built on
//!
//! ## Example
//!
//! ```rust,ignore
//! use fv_core::ComposedHeuristic;
//!
//! let mut composed = ComposedHeuristic::new(seed);
//! composed.add(generator);
//! composed.add(operator);
//!
//! let first = composed.next_values(3);
//! let snapshot = composed.snapshot();
//! ```

pub mod composed;
pub mod heuristic;
pub mod kind;
pub mod request;
pub mod response;
pub mod value;

pub use composed::{ComposedHeuristic, ComposedSnapshot, HeuristicCursor, RestoreError};
pub use heuristic::{
    BoxedHeuristic, Heuristic, HeuristicDescriptor, HeuristicKind, UnknownHeuristic,
};
pub use kind::ValueKind;
pub use request::{
    HeuristicRequest, Request, Specification, ValidValuesSection, ValidationResult,
};
pub use response::{IllegalHeuristic, Response, WarningsSection};
pub use value::FuzzedValue;

pub use uuid::Uuid;
