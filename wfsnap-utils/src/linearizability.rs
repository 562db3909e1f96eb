//! Checking [linearizability](https://en.wikipedia.org/wiki/Linearizability) of a
//! history of operations applied to a shared object.
//!
//! For more information, see the documentation of the [`WGLChecker`] and [`History`] structs.
use std::collections::HashSet;

use crate::linearizability::history::{Entry, History};
use crate::specifications::Specification;

pub mod history;

/// A linearizability checker.
///
/// An implementation of the algorithm originally defined by Jeannette Wing and Chun Gong
/// [\[WG93\]](https://www.cs.cmu.edu/~wing/publications/WingGong93.pdf), and
/// extended by Gavin Lowe [\[L17\]](http://www.cs.ox.ac.uk/people/gavin.lowe/LinearizabiltyTesting/).
/// This particular implementation is based on the description given by Alex Horn
/// and Daniel Kroening [\[HK15\]](https://arxiv.org/abs/1504.00204).
///
/// Given a history of operations, the algorithm works by linearizing each operation
/// as soon as possible. When an operation cannot be linearized, it backtracks and
/// proceeds with the next operation. Memoization occurs by caching each partial
/// linearization, and preventing the algorithm from continuing its search when it
/// is already known that the state of the object and remaining operations have no
/// valid linearization.
///
/// # Examples
///
/// Using the [`Action::Call`](history::Action::Call) and
/// [`Action::Response`](history::Action::Response) types, a scan is modeled by
/// `Call(Scan(pid, None))` followed by `Response(Scan(pid, Some(view)))`, since
/// the view cannot be known until the scan returns. An update to component `c`
/// is modeled by `Call(Update(pid, c, v))` and `Response(Update(pid, c, v))`.
///
/// ```
/// use wfsnap_utils::linearizability::WGLChecker;
/// use wfsnap_utils::linearizability::history::{Action::{Call, Response}, History};
/// use wfsnap_utils::specifications::snapshot::{SnapshotOperation::{Scan, Update}, SnapshotSpecification};
///
/// let checker = WGLChecker::new(SnapshotSpecification::new(2, 0u32));
///
/// // A scan that overlaps two updates may observe either, both, or neither.
/// // P0 |-----------|        Update(0, 1)
/// // P1    |-----------|     Update(1, 2)
/// // P2      |---|           Scan([0, 2])
/// let history = History::from_actions(vec![
///     (0, Call(Update(0, 0, 1))),
///     (1, Call(Update(1, 1, 2))),
///     (2, Call(Scan(2, None))),
///     (2, Response(Scan(2, Some(vec![0, 2])))),
///     (0, Response(Update(0, 0, 1))),
///     (1, Response(Update(1, 1, 2))),
/// ]);
/// assert!(checker.is_linearizable(history));
///
/// // Two scans must not disagree on the order in which the updates happened.
/// // P0 |-----------------|  Update(0, 1)
/// // P1 |-----------------|  Update(1, 2)
/// // P2   |---|              Scan([1, 0])
/// // P3          |---|       Scan([0, 2])
/// let history = History::from_actions(vec![
///     (0, Call(Update(0, 0, 1))),
///     (1, Call(Update(1, 1, 2))),
///     (2, Call(Scan(2, None))),
///     (2, Response(Scan(2, Some(vec![1, 0])))),
///     (3, Call(Scan(3, None))),
///     (3, Response(Scan(3, Some(vec![0, 2])))),
///     (0, Response(Update(0, 0, 1))),
///     (1, Response(Update(1, 1, 2))),
/// ]);
/// assert!(!checker.is_linearizable(history));
/// ```
///
/// # Implementations in Other Languages
///
/// For an implementation in C++, see [`linearizability-checker`](https://github.com/ahorn/linearizability-checker).
/// For an implementation in Go, see [`porcupine`](https://github.com/anishathalye/porcupine).
pub struct WGLChecker<S: Specification> {
    spec: S,
}

type OperationEntry<S> = Entry<<S as Specification>::Operation>;
type OperationCall<S> = (
    (OperationEntry<S>, OperationEntry<S>),
    <S as Specification>::State,
);

impl<S: Specification> WGLChecker<S> {
    pub fn new(spec: S) -> Self {
        Self { spec }
    }

    /// Returns whether the history of operations is linearizable with respect to the specification.
    pub fn is_linearizable(&self, mut history: History<S::Operation>) -> bool {
        let mut state = self.spec.init();
        let mut linearized = vec![false; history.len()];
        let mut calls: Vec<OperationCall<S>> = Vec::new();
        let mut cache: HashSet<(Vec<bool>, S::State)> = HashSet::new();
        let mut curr = 0;
        loop {
            if history.is_empty() {
                return true;
            }
            match &history[curr] {
                Entry::Call(call) => match &history[history.index_of_id(call.response)] {
                    Entry::Call(_) => panic!("Response cannot be a call entry"),
                    Entry::Response(response) => {
                        let (is_valid, new_state) = self.spec.apply(&response.operation, &state);
                        let mut changed = false;
                        if is_valid {
                            let mut tmp_linearized = linearized.clone();
                            tmp_linearized[call.id] = true;
                            changed = cache.insert((tmp_linearized, new_state.clone()));
                        }
                        if changed {
                            linearized[call.id] = true;
                            let call = history.lift(curr);
                            calls.push((call, state));
                            state = new_state;
                            curr = 0;
                        } else {
                            curr += 1;
                        }
                    }
                },
                Entry::Response(_) => match calls.pop() {
                    None => return false,
                    Some(((call, response), old_state)) => {
                        state = old_state;
                        linearized[call.id()] = false;
                        let (call_index, _) = history.unlift(call, response);
                        curr = call_index + 1;
                    }
                },
            }
        }
    }
}
