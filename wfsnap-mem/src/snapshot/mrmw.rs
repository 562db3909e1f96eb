//! Multi-writer multi-reader snapshot objects.
//!
//! Every component of an [`MrmwSnapshot`] may be updated by any writer. Each
//! component stores a [`Version`]: a value tagged with the stamp and ID of the
//! writer that published it. After publishing, a writer performs a snapshot of
//! its own and leaves the result in a help table, indexed by writer ID. A
//! reader that sees the same writer move twice knows that the first of those
//! updates has finished, and so has left behind a view that was obtained
//! entirely within the reader's own operation.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use wfsnap_mem::snapshot::{AtomicMrmwSnapshot, SnapshotConfig};
//!
//! let config = SnapshotConfig::new(4, 2);
//! let snapshot: Arc<AtomicMrmwSnapshot<u32>> = Arc::new(AtomicMrmwSnapshot::new(config, 0).unwrap());
//!
//! let handles: Vec<_> = (0..2)
//!     .map(|id| {
//!         let snapshot = snapshot.clone();
//!         thread::spawn(move || {
//!             let mut writer = snapshot.writer(id).unwrap();
//!             for location in 0..4 {
//!                 writer.update(location, 1);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(snapshot.snapshot(), vec![1, 1, 1, 1]);
//! ```
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::register::{AtomicRegister, MutexRegister, Register};

use super::claim::Claims;
use super::{ConfigurationError, Outcome, ProcessId, ScanReport, Snapshot, SnapshotConfig, View};

/// A wait-free multi-writer multi-reader snapshot, backed by
/// [`AtomicRegister`] objects.
pub type AtomicMrmwSnapshot<T> =
    MrmwSnapshot<T, AtomicRegister<Version<T>>, AtomicRegister<View<T>>>;

/// A multi-writer multi-reader snapshot, backed by [`MutexRegister`] objects.
///
/// Linearizable, but not lock-free.
pub type MutexMrmwSnapshot<T> =
    MrmwSnapshot<T, MutexRegister<Arc<Version<T>>>, MutexRegister<Arc<View<T>>>>;

/// The contents of one component of an [`MrmwSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Version<T> {
    value: T,
    stamp: u64,
    writer: Option<ProcessId>,
}

impl<T> Version<T> {
    fn initial(value: T) -> Self {
        Self {
            value,
            stamp: 0,
            writer: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Returns the writer that published this version, or `None` if the
    /// component still holds its initial value.
    pub fn writer(&self) -> Option<ProcessId> {
        self.writer
    }

    /// Returns whether both versions were published by the same update.
    ///
    /// Values are not compared: a stamp is never reused by the same writer.
    pub fn same_version(&self, other: &Self) -> bool {
        self.stamp == other.stamp && self.writer == other.writer
    }
}

/// A wait-free `capacity`-component multi-writer multi-reader snapshot
/// object, backed by register objects of type `R` for components and `H` for
/// the help table.
///
/// If `R` and `H` are linearizable, then so is `MrmwSnapshot<T, R, H>`.
pub struct MrmwSnapshot<T, R, H>
where
    R: Register<Value = Arc<Version<T>>>,
    H: Register<Value = Arc<View<T>>>,
{
    registers: Box<[R]>,
    help: Box<[H]>,
    claims: Claims,
    value_type: PhantomData<T>,
}

impl<T, R, H> MrmwSnapshot<T, R, H>
where
    T: Clone,
    R: Register<Value = Arc<Version<T>>>,
    H: Register<Value = Arc<View<T>>>,
{
    /// Creates a snapshot object in which every component contains `initial`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the object would have no
    /// components or no writers.
    pub fn new(config: SnapshotConfig, initial: T) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let view: Arc<View<T>> = Arc::new(vec![initial.clone(); config.capacity]);
        debug!(
            capacity = config.capacity,
            writers = config.writers,
            "created multi-writer snapshot"
        );
        Ok(Self {
            registers: (0..config.capacity)
                .map(|_| R::new(Arc::new(Version::initial(initial.clone()))))
                .collect(),
            help: (0..config.writers).map(|_| H::new(view.clone())).collect(),
            claims: Claims::new(config.writers),
            value_type: PhantomData,
        })
    }

    pub fn capacity(&self) -> usize {
        self.registers.len()
    }

    pub fn writers(&self) -> usize {
        self.help.len()
    }

    /// Returns the contents of every component, obtained by sequentially
    /// reading each register.
    ///
    /// Each component is read atomically, but the collect as a whole is not.
    pub fn collect(&self) -> Vec<Arc<Version<T>>> {
        self.registers.iter().map(|r| r.read()).collect()
    }

    /// Publishes `value` to the component at `location` on behalf of `writer`,
    /// then refreshes the writer's entry in the help table.
    ///
    /// Stamps published by a given writer must be distinct, and are expected
    /// to increase. [`MrmwWriter`] takes care of this.
    ///
    /// # Panics
    ///
    /// Panics if `writer` or `location` is out of range.
    pub fn update(&self, writer: ProcessId, location: usize, value: T, stamp: u64) {
        assert!(
            writer < self.writers(),
            "writer {writer} is out of range for {} writers",
            self.writers()
        );
        assert!(
            location < self.capacity(),
            "location {location} is out of range for capacity {}",
            self.capacity()
        );
        self.registers[location].write(Arc::new(Version {
            value,
            stamp,
            writer: Some(writer),
        }));
        let view = self.snapshot();
        self.help[writer].write(Arc::new(view));
    }

    /// Returns the value of every component, as of some instant between the
    /// call and its return.
    pub fn snapshot(&self) -> View<T> {
        self.snapshot_report().view
    }

    /// Performs a snapshot, and reports how the result was obtained.
    pub fn snapshot_report(&self) -> ScanReport<T> {
        self.scan_observed(|_| {})
    }

    /// Claims writer `id`, returning a handle through which it can update the
    /// object.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if `id` is out of range, or if another
    /// handle for `id` is still alive.
    pub fn writer(&self, id: ProcessId) -> Result<MrmwWriter<'_, T, R, H>, ConfigurationError> {
        let stamp = self.claims.acquire(id)?;
        Ok(MrmwWriter {
            snapshot: self,
            id,
            stamp,
        })
    }

    /// Performs a snapshot, calling `between` with the number of collects
    /// performed so far before every collect except the first.
    fn scan_observed(&self, mut between: impl FnMut(usize)) -> ScanReport<T> {
        // A writer has moved if it published a version we had not seen.
        let mut moved = vec![false; self.writers()];
        let mut old = self.collect();
        let mut collects = 1;
        loop {
            between(collects);
            let new = self.collect();
            collects += 1;
            debug_assert!(
                collects <= self.writers() + 2,
                "snapshot exceeded its bound of {} collects",
                self.writers() + 2
            );

            let mut clean = true;
            for (first, second) in old.iter().zip(&new) {
                if first.same_version(second) {
                    continue;
                }
                clean = false;
                // Only initial versions lack a writer, and those are never republished.
                let Some(writer) = second.writer else {
                    continue;
                };
                // A writer seen moving twice has completed an update that
                // began after this snapshot did, and the view it left in the
                // help table can be returned here.
                if moved[writer] {
                    trace!(writer, collects, "borrowing view from help table");
                    return ScanReport {
                        view: self.help[writer].read().as_ref().clone(),
                        collects,
                        outcome: Outcome::Borrowed(writer),
                    };
                }
                moved[writer] = true;
            }

            if clean {
                return ScanReport {
                    view: new.iter().map(|v| v.value.clone()).collect(),
                    collects,
                    outcome: Outcome::Clean,
                };
            }
            old = new;
        }
    }
}

impl<T, R, H> Snapshot for MrmwSnapshot<T, R, H>
where
    T: Clone,
    R: Register<Value = Arc<Version<T>>>,
    H: Register<Value = Arc<View<T>>>,
{
    type Value = T;

    fn capacity(&self) -> usize {
        MrmwSnapshot::capacity(self)
    }

    fn scan(&self) -> View<T> {
        self.snapshot()
    }
}

/// Exclusive access to one writer ID of an [`MrmwSnapshot`].
///
/// The handle owns the writer's stamp, so every update it publishes carries a
/// stamp larger than the last. Dropping the handle releases the ID, and a later
/// handle for the same ID continues from the last stamp.
pub struct MrmwWriter<'a, T, R, H>
where
    R: Register<Value = Arc<Version<T>>>,
    H: Register<Value = Arc<View<T>>>,
{
    snapshot: &'a MrmwSnapshot<T, R, H>,
    id: ProcessId,
    stamp: u64,
}

impl<'a, T, R, H> MrmwWriter<'a, T, R, H>
where
    T: Clone,
    R: Register<Value = Arc<Version<T>>>,
    H: Register<Value = Arc<View<T>>>,
{
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Returns the stamp of the last update published through this writer ID.
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Sets the component at `location` to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `location` is out of range.
    pub fn update(&mut self, location: usize, value: T) {
        self.stamp += 1;
        self.snapshot.update(self.id, location, value, self.stamp);
    }
}

impl<'a, T, R, H> Drop for MrmwWriter<'a, T, R, H>
where
    R: Register<Value = Arc<Version<T>>>,
    H: Register<Value = Arc<View<T>>>,
{
    fn drop(&mut self) {
        self.snapshot.claims.release(self.id, self.stamp);
    }
}
