//! Shared read/write registers.
//!
//! Every component of a snapshot object is stored in a [`Register`]. The
//! snapshot algorithms only ever read or overwrite a register as a whole, so
//! the properties of the register (lock-freedom, linearizability) carry over
//! to the snapshot built on top of it.
//!
//! See [`AtomicRegister`] and [`MutexRegister`].
mod atomic;
pub use self::atomic::AtomicRegister;
mod mutex;
pub use self::mutex::MutexRegister;

/// A shared-memory register.
pub trait Register {
    type Value;

    /// Creates a new register containing the specified value.
    fn new(value: Self::Value) -> Self;

    /// Returns the value currently contained in the register.
    fn read(&self) -> Self::Value;

    /// Sets contents of the register to the specified value.
    fn write(&self, value: Self::Value);
}
