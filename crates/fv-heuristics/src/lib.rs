//! # fv-heuristics
//!
//! Generator and operator catalog for the fuzz value engine.
//!
//! ## Target types
//!
//! - **Integer** ([`IntegerKind`]): boundary values, powers of two, seeded random
//!   numbers; variance and bit-flip mutations of valid values
//! - **String** ([`StringKind`]): format directives, long strings, seeded random
//!   strings; case, repetition and metacharacter mutations of valid values
//!
//! Every heuristic is reproducible from its name, parameter, seed and valid
//! values alone.

pub mod integer;
pub mod rng;
pub mod string;
pub mod strategy;

pub use integer::{IntegerKind, IntegerSpec};
pub use strategy::Strategy;
pub use string::{StringKind, StringSpec};
