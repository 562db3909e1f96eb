use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::sync::preemption_point;

use super::Register;

/// A lock-free shared-memory register holding an immutable, reference-counted
/// record.
///
/// Writers never modify a record in place. Instead, they allocate a new record
/// and publish it by atomically swapping a single pointer, so a reader either
/// observes the old record or the new one, never a mixture of the two. This
/// is how records that are much wider than a machine word, such as a value
/// paired with a stamp and a full view of a snapshot object, can be stored in
/// an "atomic" register.
///
/// Superseded records are freed as soon as the last reader holding them drops
/// its [`Arc`].
///
/// # Atomics and Memory Ordering
///
/// The strictest consistency model offered by Rust atomics is sequential
/// consistency, not linearizability. Algorithms that are linearizable on top
/// of a linearizable memory are still sequentially consistent when built from
/// this register, and retain properties such as wait-freedom. For a register
/// that is linearizable at the cost of lock-freedom, see
/// [`MutexRegister`](super::MutexRegister).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::{hint, thread};
/// use wfsnap_mem::register::{AtomicRegister, Register};
///
/// let register: Arc<AtomicRegister<(u32, &str)>> =
///     Arc::new(AtomicRegister::new(Arc::new((0, "initial"))));
///
/// let register_clone = register.clone();
/// let thread = thread::spawn(move || {
///     register_clone.write(Arc::new((1, "published")))
/// });
///
/// while register.read().0 == 0 {
///     hint::spin_loop();
/// }
/// assert_eq!(*register.read(), (1, "published"));
///
/// thread.join().unwrap();
/// ```
pub struct AtomicRegister<T> {
    register: ArcSwap<T>,
}

impl<T> Register for AtomicRegister<T> {
    type Value = Arc<T>;

    /// Creates a new register containing the specified record.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use wfsnap_mem::register::{AtomicRegister, Register};
    ///
    /// let register = AtomicRegister::new(Arc::new(7));
    /// assert_eq!(*register.read(), 7);
    /// ```
    fn new(value: Arc<T>) -> Self {
        Self {
            register: ArcSwap::new(value),
        }
    }

    /// Returns the record currently contained in the register.
    fn read(&self) -> Arc<T> {
        preemption_point();
        self.register.load_full()
    }

    /// Publishes a new record, replacing the current one.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use wfsnap_mem::register::{AtomicRegister, Register};
    ///
    /// let register = AtomicRegister::new(Arc::new(String::from("old")));
    /// register.write(Arc::new(String::from("new")));
    /// assert_eq!(register.read().as_str(), "new");
    /// ```
    fn write(&self, value: Arc<T>) {
        preemption_point();
        self.register.store(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for AtomicRegister<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicRegister")
            .field(&self.register.load())
            .finish()
    }
}

#[cfg(all(test, not(feature = "shuttle")))]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Wide {
        value: u64,
        stamp: u64,
        view: Vec<u64>,
    }

    #[test]
    fn read_returns_initial_record() {
        let register = AtomicRegister::new(Arc::new(5));
        assert_eq!(5, *register.read());
    }

    #[test]
    fn read_returns_previously_written_record() {
        let register = AtomicRegister::new(Arc::new(Wide {
            value: 0,
            stamp: 0,
            view: vec![0; 4],
        }));
        let wide = Wide {
            value: 1,
            stamp: 2,
            view: vec![3; 4],
        };
        register.write(Arc::new(wide));
        let read = register.read();
        assert_eq!(read.value, 1);
        assert_eq!(read.stamp, 2);
        assert_eq!(read.view, vec![3; 4]);
    }

    #[test]
    fn superseded_record_is_released() {
        let first = Arc::new(1);
        let register = AtomicRegister::new(first.clone());
        register.write(Arc::new(2));
        assert_eq!(Arc::strong_count(&first), 1);
    }

    #[test]
    fn reader_keeps_its_record_after_overwrite() {
        let register = AtomicRegister::new(Arc::new(1));
        let held = register.read();
        register.write(Arc::new(2));
        assert_eq!(*held, 1);
        assert_eq!(*register.read(), 2);
    }
}
