//! String generators

use fv_core::BoxedHeuristic;
use rand::Rng;

use super::data::{CONTROL_CHARACTERS, FORMAT_DIRECTIVES, LONG_STRING_LENGTHS};
use super::{FORMAT_STRINGS, LONG_STRINGS, RANDOM_STRINGS, StringSpec};
use crate::rng::stream_rng;
use crate::strategy::{Strategy, parse_parameter};

/// Strings drawn by `RandomStrings` without a parameter
pub const DEFAULT_RANDOM_COUNT: usize = 20;

/// Fill character of `LongStrings` without a parameter
pub const DEFAULT_FILL: char = 'A';

/// Runs of `%n` and `%s` directives, bare and quoted
pub fn format_strings(
    _spec: &StringSpec,
    parameter: Option<&str>,
    seed: u64,
) -> BoxedHeuristic<String> {
    let values = FORMAT_DIRECTIVES
        .iter()
        .map(|&(directive, times)| directive.repeat(times));

    Strategy::generator(FORMAT_STRINGS, seed, parameter, values).boxed()
}

/// One character repeated to one past `maxLength`, then to common buffer sizes.
///
/// `maxLength` is capped at [`MAX_STRING_LENGTH`](super::MAX_STRING_LENGTH).
///
/// The parameter's first character replaces the default fill.
pub fn long_strings(spec: &StringSpec, parameter: Option<&str>, seed: u64) -> BoxedHeuristic<String> {
    let fill = parameter
        .and_then(|p| p.chars().next())
        .unwrap_or(DEFAULT_FILL);
    let past_max = spec.bounded_max_length() + 1;
    let lengths = std::iter::once(past_max).chain(
        LONG_STRING_LENGTHS
            .iter()
            .copied()
            .filter(move |&length| length != past_max),
    );
    let values = lengths.map(move |length| std::iter::repeat_n(fill, length).collect::<String>());

    Strategy::generator(LONG_STRINGS, seed, parameter, values).boxed()
}

/// Seeded strings of printable ASCII and control characters.
///
/// Lengths stay within the specification; the parameter is the count.
pub fn random_strings(spec: &StringSpec, parameter: Option<&str>, seed: u64) -> BoxedHeuristic<String> {
    let count = parse_parameter(parameter, DEFAULT_RANDOM_COUNT, RANDOM_STRINGS);
    let max_length = spec.bounded_max_length();
    let min_length = spec.min_length.min(max_length);
    let alphabet: Vec<char> = (' '..='~').chain(CONTROL_CHARACTERS).collect();
    let mut rng = stream_rng(seed, RANDOM_STRINGS);

    let values = std::iter::repeat_with(move || {
        let length = rng.random_range(min_length..=max_length);
        (0..length)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect::<String>()
    })
    .take(count);

    Strategy::generator(RANDOM_STRINGS, seed, parameter, values).boxed()
}
