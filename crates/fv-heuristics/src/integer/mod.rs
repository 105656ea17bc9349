//! Integer target type
//!
//! Values are `i64`; the specification narrows them to a bit width and
//! signedness. Unsigned 64-bit ranges are capped at `i64::MAX`.

pub mod generators;
pub mod operators;

use fv_core::{BoxedHeuristic, Specification, UnknownHeuristic, ValidationResult, ValueKind};
use serde::{Deserialize, Serialize};

pub const BOUNDARY_NUMBERS: &str = "BoundaryNumbers";
pub const POWERS_OF_TWO: &str = "PowersOfTwo";
pub const RANDOM_NUMBERS: &str = "RandomNumbers";
pub const NUMERICAL_VARIANCE: &str = "NumericalVariance";
pub const BIT_FLIPS: &str = "BitFlips";

/// Generators in default order
pub const GENERATORS: [&str; 3] = [BOUNDARY_NUMBERS, POWERS_OF_TWO, RANDOM_NUMBERS];

/// Operators in default order
pub const OPERATORS: [&str; 2] = [NUMERICAL_VARIANCE, BIT_FLIPS];

/// Bit width and signedness of the integers under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegerSpec {
    pub bits: u32,
    pub signed: bool,
}

impl Default for IntegerSpec {
    fn default() -> Self {
        Self {
            bits: 32,
            signed: true,
        }
    }
}

impl IntegerSpec {
    pub fn signed(bits: u32) -> Self {
        Self { bits, signed: true }
    }

    pub fn unsigned(bits: u32) -> Self {
        Self {
            bits,
            signed: false,
        }
    }

    /// Bit width clamped to what an `i64` can carry
    pub fn width(&self) -> u32 {
        self.bits.clamp(1, 64)
    }

    /// Smallest value of the range
    pub fn min(&self) -> i64 {
        if self.signed {
            (-(1i128 << (self.width() - 1))) as i64
        } else {
            0
        }
    }

    /// Largest value of the range
    pub fn max(&self) -> i64 {
        let width = self.width();
        let max = if self.signed {
            (1i128 << (width - 1)) - 1
        } else {
            (1i128 << width) - 1
        };
        max.min(i128::from(i64::MAX)) as i64
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }
}

impl Specification for IntegerSpec {
    fn validate(&self, result: &mut ValidationResult) {
        if self.bits == 0 || self.bits > 64 {
            result.reject(format!(
                "integer width must be between 1 and 64 bits, got {}",
                self.bits
            ));
        } else if !self.signed && self.bits == 64 {
            result.warn("unsigned 64-bit values above i64::MAX are not produced");
        }
    }
}

/// Integer value kind
pub struct IntegerKind;

impl ValueKind for IntegerKind {
    type Value = i64;
    type Spec = IntegerSpec;

    const NAME: &'static str = "integer";

    fn parse_valid_value(raw: &str) -> Option<i64> {
        raw.parse().ok()
    }

    fn create_generator(
        name: &str,
        parameter: Option<&str>,
        spec: &IntegerSpec,
        seed: u64,
    ) -> Result<BoxedHeuristic<i64>, UnknownHeuristic> {
        match name {
            BOUNDARY_NUMBERS => Ok(generators::boundary_numbers(spec, parameter, seed)),
            POWERS_OF_TWO => Ok(generators::powers_of_two(spec, parameter, seed)),
            RANDOM_NUMBERS => Ok(generators::random_numbers(spec, parameter, seed)),
            _ => Err(UnknownHeuristic::generator(name)),
        }
    }

    fn default_generators(spec: &IntegerSpec, seed: u64) -> Vec<BoxedHeuristic<i64>> {
        GENERATORS
            .iter()
            .filter_map(|name| Self::create_generator(name, None, spec, seed).ok())
            .collect()
    }

    fn create_operator(
        name: &str,
        valid_values: &[i64],
        parameter: Option<&str>,
        spec: &IntegerSpec,
        seed: u64,
    ) -> Result<BoxedHeuristic<i64>, UnknownHeuristic> {
        match name {
            NUMERICAL_VARIANCE => Ok(operators::numerical_variance(
                valid_values,
                spec,
                parameter,
                seed,
            )),
            BIT_FLIPS => Ok(operators::bit_flips(valid_values, spec, parameter, seed)),
            _ => Err(UnknownHeuristic::operator(name)),
        }
    }

    fn default_operators(
        valid_values: &[i64],
        spec: &IntegerSpec,
        seed: u64,
    ) -> Vec<BoxedHeuristic<i64>> {
        if valid_values.is_empty() {
            return Vec::new();
        }
        OPERATORS
            .iter()
            .filter_map(|name| Self::create_operator(name, valid_values, None, spec, seed).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fv_core::{Heuristic, HeuristicKind};

    #[test]
    fn test_ranges() {
        assert_eq!(IntegerSpec::signed(8).min(), -128);
        assert_eq!(IntegerSpec::signed(8).max(), 127);
        assert_eq!(IntegerSpec::unsigned(8).min(), 0);
        assert_eq!(IntegerSpec::unsigned(8).max(), 255);
        assert_eq!(IntegerSpec::signed(64).min(), i64::MIN);
        assert_eq!(IntegerSpec::signed(64).max(), i64::MAX);
        assert_eq!(IntegerSpec::unsigned(64).max(), i64::MAX);
        assert_eq!(IntegerSpec::default().max(), i64::from(i32::MAX));
    }

    #[test]
    fn test_spec_validation() {
        let mut result = ValidationResult::new();
        IntegerSpec::signed(0).validate(&mut result);
        assert!(!result.is_valid());

        let mut result = ValidationResult::new();
        IntegerSpec::unsigned(64).validate(&mut result);
        assert!(result.is_valid());
        assert!(result.has_warnings());

        let mut result = ValidationResult::new();
        IntegerSpec::default().validate(&mut result);
        assert!(result.is_valid());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_parse_valid_values_skips_malformed() {
        let raw = vec!["10".to_string(), "notanumber".to_string(), "20".to_string()];
        assert_eq!(IntegerKind::parse_valid_values(&raw), vec![10, 20]);
    }

    #[test]
    fn test_unknown_names() {
        let spec = IntegerSpec::default();
        let err = IntegerKind::create_generator("Nope", None, &spec, 1).err().unwrap();
        assert_eq!(err.kind, HeuristicKind::Generator);

        let err = IntegerKind::create_operator("Nope", &[1], None, &spec, 1)
            .err()
            .unwrap();
        assert_eq!(err.kind, HeuristicKind::Operator);
    }

    #[test]
    fn test_defaults_are_creatable_by_name() {
        let spec = IntegerSpec::default();
        let generators = IntegerKind::default_generators(&spec, 1);
        let names: Vec<String> = generators.iter().map(|h| h.name().to_string()).collect();
        assert_eq!(names, GENERATORS);

        let operators = IntegerKind::default_operators(&[5], &spec, 1);
        assert_eq!(operators.len(), OPERATORS.len());
        assert!(operators.iter().all(|h| h.kind() == HeuristicKind::Operator));
    }

    #[test]
    fn test_no_default_operators_without_valid_values() {
        let spec = IntegerSpec::default();
        assert!(IntegerKind::default_operators(&[], &spec, 1).is_empty());
    }
}
