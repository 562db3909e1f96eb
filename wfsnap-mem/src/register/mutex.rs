use std::sync::PoisonError;

use crate::sync::Mutex;

use super::Register;

/// A shared-memory register, backed by a [`Mutex`].
///
/// This object uses a mutex to protect against concurrent memory
/// access. It is linearizable, but **not** lock-free. Snapshot objects built
/// from it are useful as a reference when testing, since any anomaly they
/// show cannot be blamed on the memory model.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wfsnap_mem::register::{MutexRegister, Register};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Record {
///     value: u32,
///     stamp: u64,
///     view: Option<Arc<Vec<u32>>>,
/// }
///
/// let register = MutexRegister::new(Record { value: 0, stamp: 0, view: None });
///
/// let record = Record { value: 7, stamp: 1, view: Some(Arc::new(vec![0, 0])) };
/// register.write(record.clone());
/// assert_eq!(register.read(), record);
/// ```
#[derive(Debug)]
pub struct MutexRegister<T: Clone> {
    mutex: Mutex<T>,
}

impl<T: Clone + Default> Default for MutexRegister<T> {
    fn default() -> Self {
        MutexRegister::new(T::default())
    }
}

impl<T: Clone> Register for MutexRegister<T> {
    type Value = T;

    /// Creates a new register containing the specified value.
    ///
    /// # Examples
    ///
    /// ```
    /// use wfsnap_mem::register::{MutexRegister, Register};
    ///
    /// let register: MutexRegister<bool> = MutexRegister::new(true);
    /// assert!(register.read());
    /// ```
    fn new(value: T) -> Self {
        Self {
            mutex: Mutex::new(value),
        }
    }

    /// Returns a copy of the value currently contained in the register.
    fn read(&self) -> Self::Value {
        self.mutex
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sets contents of the register to the specified value.
    ///
    /// # Examples
    ///
    /// ```
    /// use wfsnap_mem::register::{MutexRegister, Register};
    ///
    /// let register: MutexRegister<u32> = MutexRegister::new(0);
    /// register.write(123);
    /// assert_eq!(register.read(), 123);
    /// ```
    fn write(&self, value: Self::Value) {
        *self.mutex.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl<T: Clone> Clone for MutexRegister<T> {
    fn clone(&self) -> Self {
        Self::new(self.read())
    }
}
