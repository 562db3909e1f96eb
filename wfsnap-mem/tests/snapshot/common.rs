use std::sync::{Arc, Mutex};

#[cfg(feature = "shuttle")]
use shuttle::{
    rand::{thread_rng, Rng},
    thread,
};
#[cfg(not(feature = "shuttle"))]
use {
    rand::{thread_rng, Rng},
    std::thread,
};

use wfsnap_mem::snapshot::{
    AtomicMrmwSnapshot, AtomicMrswSnapshot, MutexMrmwSnapshot, MutexMrswSnapshot, ProcessId,
    SnapshotConfig,
};
use wfsnap_utils::specifications::snapshot::{SnapshotOperation, SnapshotSpecification};
use wfsnap_utils::{Action, History, WGLChecker};

pub const NUM_ITERATIONS: usize = 250;
pub const NUM_OPERATIONS: usize = 40;
pub const NUM_PREEMPTIONS: usize = 3;
pub const NUM_THREADS: usize = 4;
pub const CAPACITY: usize = 3;

type Operation = SnapshotOperation<u32>;

/// A snapshot object whose operations can be recorded in a history.
pub trait UnderTest: Send + Sync + 'static {
    /// Whether processes may update components other than their own.
    const MULTI_WRITER: bool;

    fn create(capacity: usize, writers: usize) -> Self;

    fn scan(&self) -> Vec<u32>;

    fn update(&self, i: ProcessId, component: usize, value: u32, stamp: u64);
}

impl UnderTest for AtomicMrmwSnapshot<u32> {
    const MULTI_WRITER: bool = true;

    fn create(capacity: usize, writers: usize) -> Self {
        Self::new(SnapshotConfig::new(capacity, writers), 0).unwrap()
    }

    fn scan(&self) -> Vec<u32> {
        self.snapshot()
    }

    fn update(&self, i: ProcessId, component: usize, value: u32, stamp: u64) {
        AtomicMrmwSnapshot::update(self, i, component, value, stamp)
    }
}

impl UnderTest for MutexMrmwSnapshot<u32> {
    const MULTI_WRITER: bool = true;

    fn create(capacity: usize, writers: usize) -> Self {
        Self::new(SnapshotConfig::new(capacity, writers), 0).unwrap()
    }

    fn scan(&self) -> Vec<u32> {
        self.snapshot()
    }

    fn update(&self, i: ProcessId, component: usize, value: u32, stamp: u64) {
        MutexMrmwSnapshot::update(self, i, component, value, stamp)
    }
}

impl UnderTest for AtomicMrswSnapshot<u32> {
    const MULTI_WRITER: bool = false;

    fn create(_: usize, writers: usize) -> Self {
        Self::new(SnapshotConfig::single_writer(writers), 0).unwrap()
    }

    fn scan(&self) -> Vec<u32> {
        AtomicMrswSnapshot::scan(self)
    }

    fn update(&self, i: ProcessId, _: usize, value: u32, _: u64) {
        AtomicMrswSnapshot::update(self, i, value)
    }
}

impl UnderTest for MutexMrswSnapshot<u32> {
    const MULTI_WRITER: bool = false;

    fn create(_: usize, writers: usize) -> Self {
        Self::new(SnapshotConfig::single_writer(writers), 0).unwrap()
    }

    fn scan(&self) -> Vec<u32> {
        MutexMrswSnapshot::scan(self)
    }

    fn update(&self, i: ProcessId, _: usize, value: u32, _: u64) {
        MutexMrswSnapshot::update(self, i, value)
    }
}

/// A snapshot that records the calls and responses of operations performed on it.
pub struct RecordingSnapshot<S: UnderTest> {
    // Actions are appended while holding the lock, so their order is
    // consistent with the real-time order of the operations.
    actions: Mutex<Vec<(ProcessId, Action<Operation>)>>,
    snapshot: S,
}

impl<S: UnderTest> RecordingSnapshot<S> {
    pub fn new(capacity: usize, writers: usize) -> Self {
        Self {
            actions: Mutex::new(vec![]),
            snapshot: S::create(capacity, writers),
        }
    }

    fn record(&self, i: ProcessId, action: Action<Operation>) {
        self.actions.lock().unwrap().push((i, action));
    }

    pub fn scan(&self, i: ProcessId) {
        self.record(i, Action::Call(Operation::Scan(i, None)));
        let view = self.snapshot.scan();
        self.record(i, Action::Response(Operation::Scan(i, Some(view))));
    }

    pub fn update(&self, i: ProcessId, component: usize, value: u32, stamp: u64) {
        self.record(i, Action::Call(Operation::Update(i, component, value)));
        self.snapshot.update(i, component, value, stamp);
        self.record(i, Action::Response(Operation::Update(i, component, value)));
    }

    pub fn history(&self) -> History<Operation> {
        History::from_actions(self.actions.lock().unwrap().clone())
    }
}

/// Assert that a history consisting of a random sequence of snapshot
/// operations, performed by `NUM_THREADS` concurrent processes, is linearizable.
///
/// # Panics
///
/// Panics if the history of random operations is not linearizable.
pub fn assert_random_operations_are_linearizable<S: UnderTest>() {
    const UPDATE_PROBABILITY: f64 = 1.0 / 2.0;

    let capacity = if S::MULTI_WRITER { CAPACITY } else { NUM_THREADS };
    let snapshot: Arc<RecordingSnapshot<S>> =
        Arc::new(RecordingSnapshot::new(capacity, NUM_THREADS));

    let mut handles = Vec::new();
    for i in 0..NUM_THREADS {
        let snapshot = snapshot.clone();
        handles.push(thread::spawn(move || {
            let mut rng = thread_rng();
            let mut stamp = 0;
            for _ in 0..NUM_OPERATIONS {
                if rng.gen_bool(UPDATE_PROBABILITY) {
                    stamp += 1;
                    let component = if S::MULTI_WRITER {
                        rng.gen_range(0..capacity)
                    } else {
                        i
                    };
                    snapshot.update(i, component, rng.gen(), stamp);
                } else {
                    snapshot.scan(i);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let checker = WGLChecker::new(SnapshotSpecification::new(capacity, 0));
    assert!(checker.is_linearizable(snapshot.history()));
}
