//! String operators

use fv_core::BoxedHeuristic;
use rand::Rng;

use super::data::{METACHARACTERS, REPETITIONS};
use super::{CHARACTER_INJECTION, STRING_CASE, STRING_REPETITION, StringSpec};
use crate::rng::stream_rng;
use crate::strategy::{Strategy, parse_parameter};

/// Injections per valid value for `CharacterInjection` without a parameter
pub const DEFAULT_INJECTIONS: usize = 3;

/// Upper case, lower case and swapped case of each valid value
pub fn string_case(
    valid_values: &[String],
    _spec: &StringSpec,
    parameter: Option<&str>,
    seed: u64,
) -> BoxedHeuristic<String> {
    let values = valid_values
        .to_vec()
        .into_iter()
        .flat_map(|valid| [valid.to_uppercase(), valid.to_lowercase(), swap_case(&valid)]);

    Strategy::operator(STRING_CASE, seed, parameter, values).boxed()
}

/// Each valid value repeated by every factor in [`REPETITIONS`]
pub fn string_repetition(
    valid_values: &[String],
    _spec: &StringSpec,
    parameter: Option<&str>,
    seed: u64,
) -> BoxedHeuristic<String> {
    let values = valid_values
        .to_vec()
        .into_iter()
        .flat_map(|valid| REPETITIONS.iter().map(move |&times| valid.repeat(times)));

    Strategy::operator(STRING_REPETITION, seed, parameter, values).boxed()
}

/// Metacharacters inserted at seeded positions of each valid value
pub fn character_injection(
    valid_values: &[String],
    _spec: &StringSpec,
    parameter: Option<&str>,
    seed: u64,
) -> BoxedHeuristic<String> {
    let injections = parse_parameter(parameter, DEFAULT_INJECTIONS, CHARACTER_INJECTION);
    let mut rng = stream_rng(seed, CHARACTER_INJECTION);

    let values = valid_values
        .to_vec()
        .into_iter()
        .flat_map(move |valid| std::iter::repeat_n(valid, injections))
        .map(move |valid| {
            let chars: Vec<char> = valid.chars().collect();
            let position = rng.random_range(0..=chars.len());
            let fragment = METACHARACTERS[rng.random_range(0..METACHARACTERS.len())];
            let mut injected: String = chars[..position].iter().collect();
            injected.push_str(fragment);
            injected.extend(&chars[position..]);
            injected
        });

    Strategy::operator(CHARACTER_INJECTION, seed, parameter, values).boxed()
}

fn swap_case(value: &str) -> String {
    value
        .chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}
