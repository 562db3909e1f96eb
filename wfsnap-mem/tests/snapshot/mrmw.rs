use wfsnap_mem::snapshot::{AtomicMrmwSnapshot, MutexMrmwSnapshot};

use super::common::assert_random_operations_are_linearizable;
#[cfg(feature = "shuttle")]
use super::common::{NUM_ITERATIONS, NUM_PREEMPTIONS};

#[cfg(feature = "shuttle")]
#[test]
fn mutex_snapshot_is_linearizable() {
    shuttle::check_pct(
        assert_random_operations_are_linearizable::<MutexMrmwSnapshot<u32>>,
        NUM_ITERATIONS,
        NUM_PREEMPTIONS,
    );
}

#[cfg(feature = "shuttle")]
#[test]
fn atomic_snapshot_is_linearizable() {
    shuttle::check_pct(
        assert_random_operations_are_linearizable::<AtomicMrmwSnapshot<u32>>,
        NUM_ITERATIONS,
        NUM_PREEMPTIONS,
    );
}

#[cfg(not(feature = "shuttle"))]
#[test]
fn mutex_snapshot_is_linearizable_under_os_threads() {
    for _ in 0..10 {
        assert_random_operations_are_linearizable::<MutexMrmwSnapshot<u32>>();
    }
}

#[cfg(not(feature = "shuttle"))]
#[test]
fn atomic_snapshot_is_linearizable_under_os_threads() {
    for _ in 0..10 {
        assert_random_operations_are_linearizable::<AtomicMrmwSnapshot<u32>>();
    }
}
