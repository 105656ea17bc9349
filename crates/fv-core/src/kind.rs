//! Per-type capability consumed by the generic request engine

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::heuristic::{BoxedHeuristic, HeuristicDescriptor, HeuristicKind, UnknownHeuristic};
use crate::request::Specification;

/// Everything the engine needs to know about one target data type.
///
/// Implementors are zero-sized markers; the engine is generic over them.
pub trait ValueKind: Send + Sync + 'static {
    /// Type of the produced values
    type Value: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + 'static;

    /// Type-specific request specification
    type Spec: Specification;

    /// Stable name, stored in persisted records
    const NAME: &'static str;

    /// Parse one raw valid value, `None` if it does not fit the type
    fn parse_valid_value(raw: &str) -> Option<Self::Value>;

    /// Create a generator by name
    fn create_generator(
        name: &str,
        parameter: Option<&str>,
        spec: &Self::Spec,
        seed: u64,
    ) -> Result<BoxedHeuristic<Self::Value>, UnknownHeuristic>;

    /// All generators used when a request names none
    fn default_generators(spec: &Self::Spec, seed: u64) -> Vec<BoxedHeuristic<Self::Value>>;

    /// Create an operator by name over a snapshot of `valid_values`
    fn create_operator(
        name: &str,
        valid_values: &[Self::Value],
        parameter: Option<&str>,
        spec: &Self::Spec,
        seed: u64,
    ) -> Result<BoxedHeuristic<Self::Value>, UnknownHeuristic>;

    /// All operators used when a request names none.
    ///
    /// Must return nothing for an empty `valid_values`.
    fn default_operators(
        valid_values: &[Self::Value],
        spec: &Self::Spec,
        seed: u64,
    ) -> Vec<BoxedHeuristic<Self::Value>>;

    /// Parse raw valid values, silently dropping those that do not parse
    fn parse_valid_values(raw: &[String]) -> Vec<Self::Value> {
        raw.iter()
            .filter_map(|value| Self::parse_valid_value(value))
            .collect()
    }

    /// Recreate a heuristic from a persisted descriptor
    fn recreate(
        descriptor: &HeuristicDescriptor,
        valid_values: &[Self::Value],
        spec: &Self::Spec,
        seed: u64,
    ) -> Result<BoxedHeuristic<Self::Value>, UnknownHeuristic> {
        let parameter = descriptor.parameter.as_deref();
        match descriptor.kind {
            HeuristicKind::Generator => {
                Self::create_generator(&descriptor.name, parameter, spec, seed)
            }
            HeuristicKind::Operator => {
                Self::create_operator(&descriptor.name, valid_values, parameter, spec, seed)
            }
        }
    }
}
