//! A sequential specification of a read/write register.
use std::fmt::Debug;
use std::hash::Hash;

use crate::specifications::Specification;

/// An operation for a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOperation<T> {
    /// Read a value of type `T` from the register.
    ///
    /// If the return value of the operation is not-yet-known, then this can be
    /// represented as `Read(None)`.
    Read(Option<T>),
    /// Write a value of type `T` to the register.
    Write(T),
}

use RegisterOperation::*;

/// A sequential specification of a register, such as the ones that hold each
/// component of a snapshot object.
pub struct RegisterSpecification<T> {
    initial: T,
}

impl<T> RegisterSpecification<T> {
    /// Creates a specification of a register that initially contains `initial`.
    pub fn with_initial(initial: T) -> Self {
        Self { initial }
    }
}

impl<T: Default> RegisterSpecification<T> {
    pub fn new() -> Self {
        Self::with_initial(T::default())
    }
}

impl<T: Default> Default for RegisterSpecification<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Debug + Eq + Hash> Specification for RegisterSpecification<T> {
    type State = T;
    type Operation = RegisterOperation<T>;

    fn init(&self) -> Self::State {
        self.initial.clone()
    }

    fn apply(&self, operation: &Self::Operation, state: &Self::State) -> (bool, Self::State) {
        match operation {
            Read(value) => {
                let value = value
                    .as_ref()
                    .expect("Cannot apply `Read` with unknown return value");
                (value == state, state.clone())
            }
            Write(value) => (true, value.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn init_returns_initial_value() {
        let spec = RegisterSpecification::with_initial(9u32);
        assert_eq!(spec.init(), 9);
        assert_eq!(RegisterSpecification::<u32>::new().init(), 0);
    }

    #[test]
    fn read_is_valid_only_if_value_is_current_state() {
        let spec = RegisterSpecification::<u32>::new();
        let (is_valid, new_state) = spec.apply(&Read(Some(0)), &spec.init());
        assert!(is_valid);
        assert_eq!(new_state, 0);
        let (is_valid, _) = spec.apply(&Read(Some(1)), &spec.init());
        assert!(!is_valid);
    }

    #[test]
    fn write_sets_new_state_to_written_value() {
        let spec = RegisterSpecification::<u32>::new();
        let (is_valid, new_state) = spec.apply(&Write(123), &spec.init());
        assert!(is_valid);
        assert_eq!(new_state, 123);
    }
}
