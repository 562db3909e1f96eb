//! An atomic snapshot backed by a [`Mutex`].
use std::sync::PoisonError;

use crate::sync::Mutex;

use super::{ConfigurationError, Snapshot, View};

/// A [`Mutex`]-based atomic snapshot.
///
/// This implementation uses a mutex to protect against concurrent memory
/// access. It is **not** lock-free, and serves as a baseline when comparing
/// the wait-free implementations.
pub struct MutexSnapshot<T: Clone> {
    mutex: Mutex<View<T>>,
}

impl<T: Clone> MutexSnapshot<T> {
    /// Creates a snapshot object in which every component contains `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, initial: T) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        Ok(Self {
            mutex: Mutex::new(vec![initial; capacity]),
        })
    }

    /// Sets contents of the component at `location` to the specified value.
    ///
    /// # Panics
    ///
    /// Panics if `location` is out of range.
    pub fn update(&self, location: usize, value: T) {
        let mut data = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        data[location] = value;
    }
}

impl<T: Clone> Snapshot for MutexSnapshot<T> {
    type Value = T;

    fn capacity(&self) -> usize {
        self.mutex
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns a vector containing the value of each component in the object.
    fn scan(&self) -> View<T> {
        self.mutex
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
