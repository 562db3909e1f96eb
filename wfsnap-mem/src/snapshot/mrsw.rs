//! Single-writer multi-reader snapshot objects, as described by Afek, Attiya,
//! Dolev, Gafni, Merritt and Shavit [[AAD+93]](https://dl.acm.org/doi/10.1145/153724.153741).
//!
//! Component `i` of an [`MrswSnapshot`] belongs to writer `i`. Every update
//! first scans the object, then publishes the new value together with an
//! incremented stamp and the view it just obtained. A scanner that sees a
//! component change twice can return the view embedded in the latest one.
//!
//! # Examples
//!
//! Obtain a consistent view of which threads have taken a step.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use wfsnap_mem::snapshot::{AtomicMrswSnapshot, SnapshotConfig};
//!
//! const N: usize = 4;
//!
//! let config = SnapshotConfig::single_writer(N);
//! let snapshot: Arc<AtomicMrswSnapshot<bool>> = Arc::new(AtomicMrswSnapshot::new(config, false).unwrap());
//!
//! let mut handles = Vec::new();
//! for i in 1..N {
//!     let snapshot = snapshot.clone();
//!     handles.push(thread::spawn(move || {
//!         snapshot.writer(i).unwrap().update(true);
//!     }));
//! }
//!
//! snapshot.update(0, true);
//!
//! let view = snapshot.scan();
//! let stepped: Vec<usize> = view
//!     .iter()
//!     .enumerate()
//!     .filter(|(_, &stepped)| stepped)
//!     .map(|(i, _)| i)
//!     .collect();
//!
//! println!("Threads {stepped:?} have taken steps!");
//! assert!(stepped.contains(&0));
//!
//! for thread in handles {
//!     thread.join().unwrap();
//! }
//! ```
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::register::{AtomicRegister, MutexRegister, Register};

use super::claim::Claims;
use super::{ConfigurationError, Outcome, ProcessId, ScanReport, Snapshot, SnapshotConfig, View};

/// A wait-free single-writer multi-reader snapshot, backed by
/// [`AtomicRegister`] objects.
pub type AtomicMrswSnapshot<T> = MrswSnapshot<T, AtomicRegister<Slot<T>>>;

/// A single-writer multi-reader snapshot, backed by [`MutexRegister`] objects.
///
/// Linearizable, but not lock-free.
pub type MutexMrswSnapshot<T> = MrswSnapshot<T, MutexRegister<Arc<Slot<T>>>>;

/// The contents of one component of an [`MrswSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot<T> {
    stamp: u64,
    value: T,
    view: Option<Arc<View<T>>>,
}

impl<T> Slot<T> {
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the view obtained by the owning writer immediately before it
    /// published this slot, or `None` for the initial slot.
    pub fn view(&self) -> Option<&View<T>> {
        self.view.as_deref()
    }
}

/// A wait-free `capacity`-component single-writer multi-reader snapshot
/// object, backed by register objects of type `R`.
///
/// This implementation relies on stamps that grow without bound, and is
/// described in Section 3 of [[AAD+93]](https://dl.acm.org/doi/10.1145/153724.153741).
/// If `R` is linearizable, then `MrswSnapshot<T, R>` is as well.
pub struct MrswSnapshot<T, R>
where
    R: Register<Value = Arc<Slot<T>>>,
{
    slots: Box<[R]>,
    claims: Claims,
    value_type: PhantomData<T>,
}

impl<T, R> MrswSnapshot<T, R>
where
    T: Clone,
    R: Register<Value = Arc<Slot<T>>>,
{
    /// Creates a snapshot object in which every component contains `initial`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] unless there is at least one writer
    /// and exactly one component per writer.
    pub fn new(config: SnapshotConfig, initial: T) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if config.capacity != config.writers {
            return Err(ConfigurationError::WriterCountMismatch {
                capacity: config.capacity,
                writers: config.writers,
            });
        }
        debug!(capacity = config.capacity, "created single-writer snapshot");
        Ok(Self {
            slots: (0..config.capacity)
                .map(|_| {
                    R::new(Arc::new(Slot {
                        stamp: 0,
                        value: initial.clone(),
                        view: None,
                    }))
                })
                .collect(),
            claims: Claims::new(config.writers),
            value_type: PhantomData,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the contents of every slot, obtained by sequentially reading
    /// each register.
    pub fn collect(&self) -> Vec<Arc<Slot<T>>> {
        self.slots.iter().map(|r| r.read()).collect()
    }

    /// Returns the value of every component, as of some instant between the
    /// call and its return.
    pub fn scan(&self) -> View<T> {
        self.scan_report().view
    }

    /// Performs a scan, and reports how the result was obtained.
    pub fn scan_report(&self) -> ScanReport<T> {
        self.scan_observed(|_| {})
    }

    /// Sets the component owned by writer `i` to `value`.
    ///
    /// Only one thread may update a given component at a time; use
    /// [`MrswSnapshot::writer`] to have this enforced.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn update(&self, i: ProcessId, value: T) {
        assert!(
            i < self.capacity(),
            "writer {i} is out of range for {} writers",
            self.capacity()
        );
        // Update the contents of the ith register with the new value, an
        // incremented stamp, and the result of a scan.
        let view = self.scan();
        let stamp = self.slots[i].read().stamp + 1;
        self.slots[i].write(Arc::new(Slot {
            stamp,
            value,
            view: Some(Arc::new(view)),
        }));
    }

    /// Claims the component belonging to writer `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if `id` is out of range, or if another
    /// handle for `id` is still alive.
    pub fn writer(&self, id: ProcessId) -> Result<MrswWriter<'_, T, R>, ConfigurationError> {
        self.claims.acquire(id)?;
        Ok(MrswWriter { snapshot: self, id })
    }

    /// Performs a scan, calling `between` with the number of collects
    /// performed so far before every collect except the first.
    fn scan_observed(&self, mut between: impl FnMut(usize)) -> ScanReport<T> {
        // A writer has moved if its stamp has been incremented.
        let mut moved = vec![false; self.capacity()];
        let mut old = self.collect();
        let mut collects = 1;
        loop {
            between(collects);
            let new = self.collect();
            collects += 1;
            debug_assert!(
                collects <= self.capacity() + 2,
                "scan exceeded its bound of {} collects",
                self.capacity() + 2
            );

            let mut clean = true;
            for j in 0..self.capacity() {
                if old[j].stamp == new[j].stamp {
                    continue;
                }
                clean = false;
                // If writer j is observed to have moved twice, then it must
                // have performed an update whose scan began after this one.
                // The result of that scan can be borrowed and returned here.
                if moved[j] {
                    trace!(writer = j, collects, "borrowing embedded view");
                    let view = new[j]
                        .view
                        .as_ref()
                        .expect("a published slot carries the view of its writer");
                    return ScanReport {
                        view: view.as_ref().clone(),
                        collects,
                        outcome: Outcome::Borrowed(j),
                    };
                }
                moved[j] = true;
            }

            if clean {
                return ScanReport {
                    view: new.iter().map(|s| s.value.clone()).collect(),
                    collects,
                    outcome: Outcome::Clean,
                };
            }
            old = new;
        }
    }
}

impl<T, R> Snapshot for MrswSnapshot<T, R>
where
    T: Clone,
    R: Register<Value = Arc<Slot<T>>>,
{
    type Value = T;

    fn capacity(&self) -> usize {
        MrswSnapshot::capacity(self)
    }

    fn scan(&self) -> View<T> {
        MrswSnapshot::scan(self)
    }
}

/// Exclusive access to the component of one writer of an [`MrswSnapshot`].
pub struct MrswWriter<'a, T, R>
where
    R: Register<Value = Arc<Slot<T>>>,
{
    snapshot: &'a MrswSnapshot<T, R>,
    id: ProcessId,
}

impl<'a, T, R> MrswWriter<'a, T, R>
where
    T: Clone,
    R: Register<Value = Arc<Slot<T>>>,
{
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Sets the component owned by this writer to `value`.
    pub fn update(&mut self, value: T) {
        self.snapshot.update(self.id, value);
    }
}

impl<'a, T, R> Drop for MrswWriter<'a, T, R>
where
    R: Register<Value = Arc<Slot<T>>>,
{
    fn drop(&mut self) {
        let stamp = self.snapshot.slots[self.id].read().stamp;
        self.snapshot.claims.release(self.id, stamp);
    }
}
