//! Integer generators

use fv_core::BoxedHeuristic;
use rand::Rng;

use super::{BOUNDARY_NUMBERS, IntegerSpec, POWERS_OF_TWO, RANDOM_NUMBERS};
use crate::rng::stream_rng;
use crate::strategy::{Strategy, parse_parameter};

/// Values drawn by `RandomNumbers` without a parameter
pub const DEFAULT_RANDOM_COUNT: usize = 20;

/// Range edges, the values around zero, then the first value past each edge.
///
/// Neighbours that do not fit an `i64` are skipped; duplicates keep their first
/// position.
pub fn boundary_numbers(
    spec: &IntegerSpec,
    parameter: Option<&str>,
    seed: u64,
) -> BoxedHeuristic<i64> {
    let (min, max) = (i128::from(spec.min()), i128::from(spec.max()));
    let inside = [min, min + 1, max - 1, max, -1, 0, 1]
        .into_iter()
        .filter(|value| (min..=max).contains(value));
    let outside = [min - 1, max + 1];

    let mut values: Vec<i64> = Vec::with_capacity(9);
    for candidate in inside.chain(outside) {
        if let Ok(value) = i64::try_from(candidate) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }

    Strategy::generator(BOUNDARY_NUMBERS, seed, parameter, values.into_iter()).boxed()
}

/// `2^k` then `-2^k` for ascending `k`, restricted to the range
pub fn powers_of_two(spec: &IntegerSpec, parameter: Option<&str>, seed: u64) -> BoxedHeuristic<i64> {
    let (min, max) = (i128::from(spec.min()), i128::from(spec.max()));
    let values = (0..64u32)
        .flat_map(|exponent| {
            let power = 1i128 << exponent;
            [power, -power]
        })
        .filter(move |value| (min..=max).contains(value))
        .map(|value| value as i64);

    Strategy::generator(POWERS_OF_TWO, seed, parameter, values).boxed()
}

/// Uniformly distributed values in range; the parameter is the count
pub fn random_numbers(spec: &IntegerSpec, parameter: Option<&str>, seed: u64) -> BoxedHeuristic<i64> {
    let count = parse_parameter(parameter, DEFAULT_RANDOM_COUNT, RANDOM_NUMBERS);
    let (min, max) = (spec.min(), spec.max());
    let mut rng = stream_rng(seed, RANDOM_NUMBERS);
    let values = std::iter::repeat_with(move || rng.random_range(min..=max)).take(count);

    Strategy::generator(RANDOM_NUMBERS, seed, parameter, values).boxed()
}
