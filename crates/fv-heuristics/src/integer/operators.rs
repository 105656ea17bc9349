//! Integer operators

use fv_core::BoxedHeuristic;
use rand::Rng;

use super::{BIT_FLIPS, IntegerSpec, NUMERICAL_VARIANCE};
use crate::rng::stream_rng;
use crate::strategy::{Strategy, parse_parameter};

/// Offset bound used by `NumericalVariance` without a parameter
pub const DEFAULT_VARIANCE: i64 = 10;

/// Variants produced by `NumericalVariance` for every valid value
pub const VARIANTS_PER_VALUE: usize = 4;

/// Each valid value moved by seeded non-zero offsets of at most the variance.
///
/// Results saturate at the edges of the range.
pub fn numerical_variance(
    valid_values: &[i64],
    spec: &IntegerSpec,
    parameter: Option<&str>,
    seed: u64,
) -> BoxedHeuristic<i64> {
    let variance = parse_parameter(parameter, DEFAULT_VARIANCE, NUMERICAL_VARIANCE)
        .checked_abs()
        .unwrap_or(i64::MAX)
        .max(1);
    let (min, max) = (spec.min(), spec.max());
    let mut rng = stream_rng(seed, NUMERICAL_VARIANCE);

    let values = valid_values.to_vec().into_iter().flat_map(move |valid| {
        let offsets: Vec<i64> = (0..VARIANTS_PER_VALUE)
            .map(|_| {
                let offset = rng.random_range(1..=variance);
                if rng.random_bool(0.5) { -offset } else { offset }
            })
            .collect();
        offsets
            .into_iter()
            .map(move |offset| valid.saturating_add(offset).clamp(min, max))
    });

    Strategy::operator(NUMERICAL_VARIANCE, seed, parameter, values).boxed()
}

/// Each valid value with every bit of the width flipped in turn, lowest bit first
pub fn bit_flips(
    valid_values: &[i64],
    spec: &IntegerSpec,
    parameter: Option<&str>,
    seed: u64,
) -> BoxedHeuristic<i64> {
    let width = spec.width();
    let values = valid_values
        .to_vec()
        .into_iter()
        .flat_map(move |valid| (0..width).map(move |bit| valid ^ (1i64 << bit)));

    Strategy::operator(BIT_FLIPS, seed, parameter, values).boxed()
}
