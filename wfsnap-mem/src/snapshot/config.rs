use thiserror::Error;

use super::ProcessId;

/// The shape of a snapshot object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Number of components.
    pub capacity: usize,
    /// Number of distinct writers. Writer IDs range over `0..writers`.
    pub writers: usize,
}

impl SnapshotConfig {
    pub fn new(capacity: usize, writers: usize) -> Self {
        Self { capacity, writers }
    }

    /// A configuration in which every writer owns exactly one component.
    pub fn single_writer(writers: usize) -> Self {
        Self::new(writers, writers)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if self.writers == 0 {
            return Err(ConfigurationError::NoWriters);
        }
        Ok(())
    }
}

/// Rejected configuration of a snapshot object or one of its writers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("a snapshot object needs at least one component")]
    ZeroCapacity,
    #[error("a snapshot object needs at least one writer")]
    NoWriters,
    /// A single-writer object needs exactly one component per writer.
    #[error("capacity {capacity} does not match the number of writers {writers}")]
    WriterCountMismatch { capacity: usize, writers: usize },
    #[error("writer {id} is out of range for {writers} writers")]
    UnknownWriter { id: ProcessId, writers: usize },
    #[error("writer {0} is already claimed by another handle")]
    WriterClaimed(ProcessId),
}
