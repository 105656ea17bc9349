//! Inbound requests and their validation

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type-specific description of the values being fuzzed (bit width, lengths, ...)
pub trait Specification:
    Clone + fmt::Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Add warnings for questionable settings and reject unusable ones
    fn validate(&self, result: &mut ValidationResult);
}

/// A generator or operator selection: strategy name plus optional raw parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl HeuristicRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter: None,
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }
}

/// Known-valid values in raw string form plus the operators to apply to them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidValuesSection {
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub requested_operators: Vec<HeuristicRequest>,
}

/// Outcome of [`Request::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    valid: bool,
    warnings: Vec<String>,
}

impl ValidationResult {
    /// A valid result without warnings
    pub fn new() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    /// Record a non-fatal finding
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Mark the request invalid and record why
    pub fn reject(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.warnings.push(message.into());
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A request for fuzzed values of one target type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "S: Deserialize<'de> + Default")
)]
pub struct Request<S> {
    pub name: String,
    /// Set on continuation requests, assigned by the engine otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub seed: u64,
    pub max_values: usize,
    #[serde(default)]
    pub requested_generators: Vec<HeuristicRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<ValidValuesSection>,
    #[serde(default)]
    pub use_no_generators: bool,
    #[serde(default)]
    pub specification: S,
}

impl<S: Default> Request<S> {
    /// Create a request that uses all default generators
    pub fn new(name: impl Into<String>, max_values: usize) -> Self {
        Self {
            name: name.into(),
            id: None,
            seed: 0,
            max_values,
            requested_generators: Vec::new(),
            valid_values: None,
            use_no_generators: false,
            specification: S::default(),
        }
    }
}

impl<S> Request<S> {
    /// Builder: set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder: mark as continuation of `id`
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Builder: set max values
    pub fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = max_values;
        self
    }

    /// Builder: request a generator
    pub fn with_generator(mut self, generator: HeuristicRequest) -> Self {
        self.requested_generators.push(generator);
        self
    }

    /// Builder: add raw valid values
    pub fn with_valid_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.valid_values
            .get_or_insert_with(ValidValuesSection::default)
            .values
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Builder: request an operator
    pub fn with_operator(mut self, operator: HeuristicRequest) -> Self {
        self.valid_values
            .get_or_insert_with(ValidValuesSection::default)
            .requested_operators
            .push(operator);
        self
    }

    /// Builder: skip the default generators when none are named
    pub fn without_generators(mut self) -> Self {
        self.use_no_generators = true;
        self
    }

    /// Builder: set the type specification
    pub fn with_specification(mut self, specification: S) -> Self {
        self.specification = specification;
        self
    }

    /// Raw valid values, empty without a valid-values section
    pub fn raw_valid_values(&self) -> &[String] {
        self.valid_values
            .as_ref()
            .map(|section| section.values.as_slice())
            .unwrap_or_default()
    }

    /// Requested operators, empty without a valid-values section
    pub fn requested_operators(&self) -> &[HeuristicRequest] {
        self.valid_values
            .as_ref()
            .map(|section| section.requested_operators.as_slice())
            .unwrap_or_default()
    }
}

impl<S: Specification> Request<S> {
    /// Check the request for problems.
    ///
    /// An invalid request still gets a response header, but no values.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.name.trim().is_empty() {
            result.reject("request name must not be empty");
        }
        if self.max_values == 0 {
            result.warn("maxValues is 0, no values will be produced");
        }
        if let Some(section) = &self.valid_values {
            if section.values.is_empty() && !section.requested_operators.is_empty() {
                result.warn("operators requested without any valid values");
            }
        }

        self.specification.validate(&mut result);
        result
    }
}
