//! Heuristic capability
//!
//! A heuristic is a named strategy producing a lazy, finite sequence of
//! [`FuzzedValue`]s. Generators need nothing but their own strategy, operators
//! derive values from a snapshot of known-valid values taken at construction.
//!
//! Heuristics are not restartable: a value yielded once is never yielded again
//! by the same instance. Rebuilding a heuristic from its [`HeuristicDescriptor`]
//! with the same seed and valid values reproduces the identical sequence, which
//! is what persisted compositions rely on.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::FuzzedValue;

/// Whether a heuristic needs reference values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    /// Produces values from its own strategy
    Generator,
    /// Mutates a supplied collection of valid values
    Operator,
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generator => f.write_str("generator"),
            Self::Operator => f.write_str("operator"),
        }
    }
}

/// A lazy, finite, non-restartable source of fuzzed values
pub trait Heuristic<T>: Iterator<Item = FuzzedValue<T>> + Send {
    /// Registered strategy name, also used as the source name of every value
    fn name(&self) -> &str;

    /// Generator or operator
    fn kind(&self) -> HeuristicKind;

    /// Seed the heuristic was created with
    fn seed(&self) -> u64;

    /// Raw parameter the heuristic was requested with, if any
    fn parameter(&self) -> Option<&str> {
        None
    }

    /// Everything needed to recreate this heuristic through a factory
    fn descriptor(&self) -> HeuristicDescriptor {
        HeuristicDescriptor {
            kind: self.kind(),
            name: self.name().to_string(),
            parameter: self.parameter().map(str::to_string),
        }
    }
}

/// Owned, type-erased heuristic
pub type BoxedHeuristic<T> = Box<dyn Heuristic<T>>;

/// Recipe for recreating a heuristic: kind, name and raw parameter.
///
/// Seed and valid values are shared by every heuristic of one composition and
/// are stored once alongside the descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeuristicDescriptor {
    pub kind: HeuristicKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// A requested strategy name is not registered for the target type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {name}")]
pub struct UnknownHeuristic {
    pub kind: HeuristicKind,
    pub name: String,
}

impl UnknownHeuristic {
    pub fn generator(name: impl Into<String>) -> Self {
        Self {
            kind: HeuristicKind::Generator,
            name: name.into(),
        }
    }

    pub fn operator(name: impl Into<String>) -> Self {
        Self {
            kind: HeuristicKind::Operator,
            name: name.into(),
        }
    }

    /// Reason reported in the warnings section of a response
    pub fn reason(&self) -> &'static str {
        match self.kind {
            HeuristicKind::Generator => "unknown generator",
            HeuristicKind::Operator => "unknown operator",
        }
    }
}
