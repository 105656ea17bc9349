//! Ordered composition of heuristics into one bounded, resumable stream
//!
//! Heuristics are drained by strict concatenation: the first heuristic is
//! exhausted before the second yields anything. The cursor records how many
//! values each heuristic has produced so a composition can be rebuilt and
//! fast-forwarded to exactly where it stopped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::heuristic::{BoxedHeuristic, HeuristicDescriptor, UnknownHeuristic};
use crate::value::FuzzedValue;

struct Slot<T> {
    heuristic: BoxedHeuristic<T>,
    emitted: u64,
    exhausted: bool,
}

/// Position of one heuristic inside a persisted composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicCursor {
    pub descriptor: HeuristicDescriptor,
    pub emitted: u64,
    pub exhausted: bool,
}

/// Serializable state of a [`ComposedHeuristic`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedSnapshot {
    pub seed: u64,
    /// Index of the heuristic currently being drained
    pub current: usize,
    /// Total values emitted so far
    pub emitted: u64,
    pub heuristics: Vec<HeuristicCursor>,
}

/// Failure to rebuild a composition from a snapshot
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error(transparent)]
    UnknownHeuristic(#[from] UnknownHeuristic),

    #[error("heuristic {name} ended after {produced} values, snapshot recorded {expected}")]
    ShortHeuristic {
        name: String,
        produced: u64,
        expected: u64,
    },

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// Strict concatenation of heuristics sharing one seed
pub struct ComposedHeuristic<T> {
    seed: u64,
    slots: Vec<Slot<T>>,
    current: usize,
    emitted: u64,
}

impl<T> ComposedHeuristic<T> {
    /// Create an empty composition
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            slots: Vec::new(),
            current: 0,
            emitted: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of heuristics in the composition
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total values emitted since creation, including those before a restore
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// True once every heuristic has run dry
    pub fn is_exhausted(&self) -> bool {
        self.current >= self.slots.len()
    }

    /// Append a heuristic; evaluation order is append order
    pub fn add(&mut self, heuristic: BoxedHeuristic<T>) {
        self.slots.push(Slot {
            heuristic,
            emitted: 0,
            exhausted: false,
        });
    }

    /// Pull up to `bound` more values.
    ///
    /// Fewer than `bound` values are returned only when every heuristic is
    /// exhausted.
    pub fn next_values(&mut self, bound: usize) -> Vec<FuzzedValue<T>> {
        let values: Vec<_> = self.by_ref().take(bound).collect();
        log::debug!(
            "Drained {} of {} requested values ({} emitted in total)",
            values.len(),
            bound,
            self.emitted
        );
        values
    }

    /// Descriptors of all heuristics in evaluation order
    pub fn descriptors(&self) -> Vec<HeuristicDescriptor> {
        self.slots
            .iter()
            .map(|slot| slot.heuristic.descriptor())
            .collect()
    }

    /// Capture the cursor of every heuristic
    pub fn snapshot(&self) -> ComposedSnapshot {
        ComposedSnapshot {
            seed: self.seed,
            current: self.current,
            emitted: self.emitted,
            heuristics: self
                .slots
                .iter()
                .map(|slot| HeuristicCursor {
                    descriptor: slot.heuristic.descriptor(),
                    emitted: slot.emitted,
                    exhausted: slot.exhausted,
                })
                .collect(),
        }
    }

    /// Rebuild a composition from a snapshot.
    ///
    /// `resolve` recreates each heuristic from its descriptor; every recreated
    /// heuristic is then fast-forwarded past the values it had already
    /// emitted, so the remaining stream equals the uninterrupted one.
    pub fn restore<F>(snapshot: &ComposedSnapshot, mut resolve: F) -> Result<Self, RestoreError>
    where
        F: FnMut(&HeuristicDescriptor) -> Result<BoxedHeuristic<T>, UnknownHeuristic>,
    {
        if snapshot.current > snapshot.heuristics.len() {
            return Err(RestoreError::Inconsistent(format!(
                "current heuristic {} of {}",
                snapshot.current,
                snapshot.heuristics.len()
            )));
        }

        let recorded: u64 = snapshot.heuristics.iter().map(|c| c.emitted).sum();
        if recorded != snapshot.emitted {
            return Err(RestoreError::Inconsistent(format!(
                "heuristics emitted {} values, composition recorded {}",
                recorded, snapshot.emitted
            )));
        }

        let mut composed = Self::new(snapshot.seed);
        for cursor in &snapshot.heuristics {
            let mut heuristic = resolve(&cursor.descriptor)?;
            let produced = heuristic.by_ref().take(cursor.emitted as usize).count() as u64;
            if produced < cursor.emitted {
                return Err(RestoreError::ShortHeuristic {
                    name: cursor.descriptor.name.clone(),
                    produced,
                    expected: cursor.emitted,
                });
            }
            composed.slots.push(Slot {
                heuristic,
                emitted: cursor.emitted,
                exhausted: cursor.exhausted,
            });
        }
        composed.current = snapshot.current;
        composed.emitted = snapshot.emitted;

        Ok(composed)
    }
}

impl<T> Iterator for ComposedHeuristic<T> {
    type Item = FuzzedValue<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.get_mut(self.current) {
            if !slot.exhausted {
                if let Some(value) = slot.heuristic.next() {
                    slot.emitted += 1;
                    self.emitted += 1;
                    return Some(value);
                }
                slot.exhausted = true;
            }
            self.current += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{Heuristic, HeuristicKind};

    /// Yields `start..start + count`, named after its start value
    struct Counter {
        name: String,
        next: u32,
        end: u32,
    }

    impl Counter {
        fn boxed(start: u32, count: u32) -> BoxedHeuristic<u32> {
            Box::new(Self {
                name: format!("Counter{start}"),
                next: start,
                end: start + count,
            })
        }
    }

    impl Iterator for Counter {
        type Item = FuzzedValue<u32>;

        fn next(&mut self) -> Option<Self::Item> {
            if self.next >= self.end {
                return None;
            }
            let value = self.next;
            self.next += 1;
            Some(FuzzedValue::new(value, self.name.clone()))
        }
    }

    impl Heuristic<u32> for Counter {
        fn name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> HeuristicKind {
            HeuristicKind::Generator
        }

        fn seed(&self) -> u64 {
            7
        }
    }

    fn resolve(descriptor: &HeuristicDescriptor) -> Result<BoxedHeuristic<u32>, UnknownHeuristic> {
        match descriptor.name.as_str() {
            "Counter0" => Ok(Counter::boxed(0, 3)),
            "Counter100" => Ok(Counter::boxed(100, 2)),
            other => Err(UnknownHeuristic::generator(other)),
        }
    }

    fn composed() -> ComposedHeuristic<u32> {
        let mut composed = ComposedHeuristic::new(7);
        composed.add(Counter::boxed(0, 3));
        composed.add(Counter::boxed(100, 2));
        composed
    }

    fn raw(values: Vec<FuzzedValue<u32>>) -> Vec<u32> {
        values.into_iter().map(FuzzedValue::into_value).collect()
    }

    #[test]
    fn test_strict_concatenation() {
        let mut composed = composed();
        assert_eq!(raw(composed.next_values(10)), vec![0, 1, 2, 100, 101]);
        assert!(composed.is_exhausted());
        assert_eq!(composed.emitted(), 5);
    }

    #[test]
    fn test_bound_is_respected() {
        let mut composed = composed();
        assert_eq!(raw(composed.next_values(2)), vec![0, 1]);
        assert_eq!(raw(composed.next_values(2)), vec![2, 100]);
        assert_eq!(raw(composed.next_values(2)), vec![101]);
        assert!(composed.next_values(2).is_empty());
    }

    #[test]
    fn test_empty_composition() {
        let mut composed: ComposedHeuristic<u32> = ComposedHeuristic::new(1);
        assert!(composed.is_empty());
        assert!(composed.next_values(5).is_empty());
    }

    #[test]
    fn test_source_names_follow_heuristics() {
        let mut composed = composed();
        let names: Vec<String> = composed
            .next_values(4)
            .iter()
            .map(|v| v.source_name().to_string())
            .collect();
        assert_eq!(names, vec!["Counter0", "Counter0", "Counter0", "Counter100"]);
    }

    #[test]
    fn test_snapshot_restore_resumes_stream() {
        let mut interrupted = composed();
        let mut first = raw(interrupted.next_values(4));

        let snapshot = interrupted.snapshot();
        assert_eq!(snapshot.current, 1);
        assert_eq!(snapshot.emitted, 4);
        assert_eq!(snapshot.heuristics[0].emitted, 3);
        assert!(snapshot.heuristics[0].exhausted);

        let mut restored = ComposedHeuristic::restore(&snapshot, resolve).unwrap();
        first.extend(raw(restored.next_values(10)));

        assert_eq!(first, raw(composed().next_values(10)));
        assert_eq!(restored.emitted(), 5);
    }

    #[test]
    fn test_restore_rejects_unknown_descriptor() {
        let mut snapshot = composed().snapshot();
        snapshot.heuristics[1].descriptor.name = "Missing".into();
        let err = ComposedHeuristic::restore(&snapshot, resolve).err().unwrap();
        assert!(matches!(err, RestoreError::UnknownHeuristic(_)));
    }

    #[test]
    fn test_restore_rejects_inconsistent_counts() {
        let mut snapshot = composed().snapshot();
        snapshot.emitted = 3;
        let err = ComposedHeuristic::restore(&snapshot, resolve).err().unwrap();
        assert!(matches!(err, RestoreError::Inconsistent(_)));
    }

    #[test]
    fn test_restore_rejects_overlong_cursor() {
        let mut snapshot = composed().snapshot();
        snapshot.heuristics[1].emitted = 5;
        snapshot.emitted = 5;
        let err = ComposedHeuristic::restore(&snapshot, resolve).err().unwrap();
        assert!(matches!(
            err,
            RestoreError::ShortHeuristic {
                produced: 2,
                expected: 5,
                ..
            }
        ));
    }
}
