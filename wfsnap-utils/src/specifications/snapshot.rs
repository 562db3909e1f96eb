//! A sequential specification of a [snapshot object](https://en.wikipedia.org/wiki/Shared_snapshot_objects).
use std::fmt::Debug;
use std::hash::Hash;

use crate::specifications::Specification;

pub use crate::linearizability::history::ProcessId;

use SnapshotOperation::{Scan, Update};

/// An operation for a snapshot object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOperation<T> {
    /// Scan the object and return a view containing the values in each component.
    ///
    /// If the return value of a scan is not-yet-known, this can be represented
    /// as `Scan(pid, None)`.
    Scan(ProcessId, Option<Vec<T>>),
    /// Update a component of the object.
    ///
    /// `Update(pid, c, v)` sets component `c` to `v`. For single-writer
    /// objects, `c` is always equal to `pid`.
    Update(ProcessId, usize, T),
}

/// A specification of a `capacity`-component [snapshot object](https://en.wikipedia.org/wiki/Shared_snapshot_objects).
///
/// Each component of the snapshot contains a value of type `T`, and any
/// process may update any component.
pub struct SnapshotSpecification<T> {
    capacity: usize,
    initial: T,
}

impl<T> SnapshotSpecification<T> {
    /// Creates a specification of an object in which every component
    /// initially contains `initial`.
    pub fn new(capacity: usize, initial: T) -> Self {
        Self { capacity, initial }
    }
}

impl<T: Clone + Debug + Eq + Hash> Specification for SnapshotSpecification<T> {
    type State = Vec<T>;
    type Operation = SnapshotOperation<T>;

    fn init(&self) -> Self::State {
        vec![self.initial.clone(); self.capacity]
    }

    fn apply(&self, operation: &Self::Operation, state: &Self::State) -> (bool, Self::State) {
        match operation {
            Scan(_, result) => match result {
                Some(view) => (view == state, state.clone()),
                None => panic!("Cannot apply Scan with an unknown return value."),
            },
            Update(_, component, value) => {
                if *component >= state.len() {
                    return (false, state.clone());
                }
                let mut new_state = state.clone();
                new_state[*component] = value.clone();
                (true, new_state)
            }
        }
    }
}
