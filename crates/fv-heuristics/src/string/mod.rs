//! String target type

pub mod data;
pub mod generators;
pub mod operators;

use fv_core::{BoxedHeuristic, Specification, UnknownHeuristic, ValidationResult, ValueKind};
use serde::{Deserialize, Serialize};

pub const FORMAT_STRINGS: &str = "FormatStrings";
pub const LONG_STRINGS: &str = "LongStrings";
pub const RANDOM_STRINGS: &str = "RandomStrings";
pub const STRING_CASE: &str = "StringCase";
pub const STRING_REPETITION: &str = "StringRepetition";
pub const CHARACTER_INJECTION: &str = "CharacterInjection";

/// Generators in default order
pub const GENERATORS: [&str; 3] = [FORMAT_STRINGS, LONG_STRINGS, RANDOM_STRINGS];

/// Operators in default order
pub const OPERATORS: [&str; 3] = [STRING_CASE, STRING_REPETITION, CHARACTER_INJECTION];

/// Largest `maxLength` a specification may ask for
pub const MAX_STRING_LENGTH: usize = 65_536;

/// Length bounds of the strings under test, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StringSpec {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for StringSpec {
    fn default() -> Self {
        Self {
            min_length: 0,
            max_length: 256,
        }
    }
}

impl StringSpec {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// `max_length` limited to [`MAX_STRING_LENGTH`]
    pub fn bounded_max_length(&self) -> usize {
        self.max_length.min(MAX_STRING_LENGTH)
    }
}

impl Specification for StringSpec {
    fn validate(&self, result: &mut ValidationResult) {
        if self.min_length > self.max_length {
            result.reject(format!(
                "minLength {} exceeds maxLength {}",
                self.min_length, self.max_length
            ));
        }
        if self.max_length > MAX_STRING_LENGTH {
            result.reject(format!(
                "maxLength {} exceeds the supported {}",
                self.max_length, MAX_STRING_LENGTH
            ));
        }
    }
}

/// String value kind
pub struct StringKind;

impl ValueKind for StringKind {
    type Value = String;
    type Spec = StringSpec;

    const NAME: &'static str = "string";

    fn parse_valid_value(raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    fn create_generator(
        name: &str,
        parameter: Option<&str>,
        spec: &StringSpec,
        seed: u64,
    ) -> Result<BoxedHeuristic<String>, UnknownHeuristic> {
        match name {
            FORMAT_STRINGS => Ok(generators::format_strings(spec, parameter, seed)),
            LONG_STRINGS => Ok(generators::long_strings(spec, parameter, seed)),
            RANDOM_STRINGS => Ok(generators::random_strings(spec, parameter, seed)),
            _ => Err(UnknownHeuristic::generator(name)),
        }
    }

    fn default_generators(spec: &StringSpec, seed: u64) -> Vec<BoxedHeuristic<String>> {
        GENERATORS
            .iter()
            .filter_map(|name| Self::create_generator(name, None, spec, seed).ok())
            .collect()
    }

    fn create_operator(
        name: &str,
        valid_values: &[String],
        parameter: Option<&str>,
        spec: &StringSpec,
        seed: u64,
    ) -> Result<BoxedHeuristic<String>, UnknownHeuristic> {
        match name {
            STRING_CASE => Ok(operators::string_case(valid_values, spec, parameter, seed)),
            STRING_REPETITION => Ok(operators::string_repetition(
                valid_values,
                spec,
                parameter,
                seed,
            )),
            CHARACTER_INJECTION => Ok(operators::character_injection(
                valid_values,
                spec,
                parameter,
                seed,
            )),
            _ => Err(UnknownHeuristic::operator(name)),
        }
    }

    fn default_operators(
        valid_values: &[String],
        spec: &StringSpec,
        seed: u64,
    ) -> Vec<BoxedHeuristic<String>> {
        if valid_values.is_empty() {
            return Vec::new();
        }
        OPERATORS
            .iter()
            .filter_map(|name| Self::create_operator(name, valid_values, None, spec, seed).ok())
            .collect()
    }
}
