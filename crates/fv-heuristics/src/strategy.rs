//! Adapter turning a plain value iterator into a named heuristic

use std::str::FromStr;

use fv_core::{BoxedHeuristic, FuzzedValue, Heuristic, HeuristicKind};

/// A heuristic backed by any iterator of raw values.
///
/// Every catalog entry is a function building one of these around a lazy
/// iterator; operators capture their own copy of the valid values.
pub struct Strategy<I> {
    name: &'static str,
    kind: HeuristicKind,
    seed: u64,
    parameter: Option<String>,
    values: I,
}

impl<I: Iterator> Strategy<I> {
    pub fn generator(name: &'static str, seed: u64, parameter: Option<&str>, values: I) -> Self {
        Self::new(name, HeuristicKind::Generator, seed, parameter, values)
    }

    pub fn operator(name: &'static str, seed: u64, parameter: Option<&str>, values: I) -> Self {
        Self::new(name, HeuristicKind::Operator, seed, parameter, values)
    }

    fn new(
        name: &'static str,
        kind: HeuristicKind,
        seed: u64,
        parameter: Option<&str>,
        values: I,
    ) -> Self {
        Self {
            name,
            kind,
            seed,
            parameter: parameter.map(str::to_string),
            values,
        }
    }

    /// Type-erase into a boxed heuristic
    pub fn boxed(self) -> BoxedHeuristic<I::Item>
    where
        I: Send + 'static,
        I::Item: 'static,
    {
        Box::new(self)
    }
}

impl<I: Iterator> Iterator for Strategy<I> {
    type Item = FuzzedValue<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.values
            .next()
            .map(|value| FuzzedValue::new(value, self.name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<I> Heuristic<I::Item> for Strategy<I>
where
    I: Iterator + Send,
{
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> HeuristicKind {
        self.kind
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }
}

/// Parse a heuristic parameter, falling back to `default` when absent or malformed
pub(crate) fn parse_parameter<T: FromStr>(parameter: Option<&str>, default: T, heuristic: &str) -> T {
    match parameter {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed parameter {:?} for {}", raw, heuristic);
            default
        }),
    }
}
