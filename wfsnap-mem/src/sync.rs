#[cfg(feature = "shuttle")]
pub(crate) use shuttle::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex,
};
#[cfg(not(feature = "shuttle"))]
pub(crate) use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex,
};

/// Gives the model checker a chance to preempt the current thread.
///
/// Registers backed by `arc-swap` perform their loads and stores outside of
/// `shuttle`'s view, so each access is preceded by an explicit scheduling point.
#[cfg(feature = "shuttle")]
#[inline]
pub(crate) fn preemption_point() {
    shuttle::thread::yield_now();
}

#[cfg(not(feature = "shuttle"))]
#[inline(always)]
pub(crate) fn preemption_point() {}
