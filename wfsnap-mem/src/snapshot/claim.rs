//! Exclusive ownership of writer IDs.
use crate::sync::{AtomicBool, AtomicU64, Ordering};

use super::{ConfigurationError, ProcessId};

struct Claim {
    held: AtomicBool,
    // Last stamp published by the writer, kept across handles so that a
    // re-claimed writer never reuses a stamp.
    stamp: AtomicU64,
}

/// A table recording which writer IDs are currently owned by a handle.
pub(crate) struct Claims {
    claims: Box<[Claim]>,
}

impl Claims {
    pub(crate) fn new(writers: usize) -> Self {
        Self {
            claims: (0..writers)
                .map(|_| Claim {
                    held: AtomicBool::new(false),
                    stamp: AtomicU64::new(0),
                })
                .collect(),
        }
    }

    /// Takes ownership of writer `id`, returning the last stamp it published.
    pub(crate) fn acquire(&self, id: ProcessId) -> Result<u64, ConfigurationError> {
        let writers = self.claims.len();
        let claim = self
            .claims
            .get(id)
            .ok_or(ConfigurationError::UnknownWriter { id, writers })?;
        claim
            .held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ConfigurationError::WriterClaimed(id))?;
        Ok(claim.stamp.load(Ordering::SeqCst))
    }

    /// Gives up ownership of writer `id`, recording the last stamp it published.
    pub(crate) fn release(&self, id: ProcessId, stamp: u64) {
        let claim = &self.claims[id];
        claim.stamp.store(stamp, Ordering::SeqCst);
        claim.held.store(false, Ordering::SeqCst);
    }
}
