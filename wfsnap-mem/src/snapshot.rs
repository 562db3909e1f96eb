//! Shared `capacity`-component snapshot objects.
//!
//! A snapshot object is an array of components that writers update one
//! component at a time, and that readers can *scan*, obtaining the value of
//! every component as if the whole array had been read in a single atomic step.
//!
//! * [`MrmwSnapshot`]: any writer may update any component.
//! * [`MrswSnapshot`]: component `i` is only ever updated by writer `i`.
//! * [`MutexSnapshot`]: a lock-based reference implementation.
//!
//! Both wait-free objects are built on the classic *double collect*: read every
//! component twice, and if nothing changed in between then the second read was
//! an instantaneous view. When a writer is seen to move twice during a single
//! scan, the scan instead borrows a view that the writer itself computed while
//! the scan was in progress. A writer can only be seen moving for the first
//! time once per scan, which bounds the number of collects by the number of
//! writers.
use std::fmt::Debug;

mod claim;
mod config;
pub mod mrmw;
pub mod mrsw;
pub mod mutex;

pub use config::{ConfigurationError, SnapshotConfig};
pub use mrmw::{AtomicMrmwSnapshot, MrmwSnapshot, MrmwWriter, MutexMrmwSnapshot, Version};
pub use mrsw::{AtomicMrswSnapshot, MrswSnapshot, MrswWriter, MutexMrswSnapshot, Slot};
pub use mutex::MutexSnapshot;

/// An ID for a process (or thread).
pub type ProcessId = usize;

/// The value of every component of a snapshot object, in component order.
pub type View<T> = Vec<T>;

/// A snapshot object that can be scanned by any number of readers.
pub trait Snapshot {
    type Value: Clone;

    /// Returns the number of components in the object.
    fn capacity(&self) -> usize;

    /// Returns a vector containing the value of each component in the object.
    fn scan(&self) -> View<Self::Value>;
}

/// How a scan obtained its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Two consecutive collects observed no change.
    Clean,
    /// The scan returned a view computed by the given writer, after observing
    /// that writer move twice.
    Borrowed(ProcessId),
}

/// The result of a scan, along with how it was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanReport<T> {
    pub view: View<T>,
    /// Number of collects performed, including the first.
    pub collects: usize,
    pub outcome: Outcome,
}
