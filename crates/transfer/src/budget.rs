//! Byte budget enforcement.

use crate::{Result, TransferError};

/// Tracks bytes transferred against an optional ceiling and exact size.
///
/// Overruns are reported on the chunk that causes them, so an oversized
/// stream is aborted without buffering the rest of it. Underruns of the
/// exact size can only be known at end of stream ([`finish`](Self::finish)).
#[derive(Debug, Clone, Default)]
pub struct ByteBudget {
    so_far: u64,
    max_size: Option<u64>,
    exact_size: Option<u64>,
}

impl ByteBudget {
    pub fn new(max_size: Option<u64>, exact_size: Option<u64>) -> Self {
        Self {
            so_far: 0,
            max_size,
            exact_size,
        }
    }

    /// Accounts for a chunk of `len` bytes.
    pub fn observe(&mut self, len: usize) -> Result<()> {
        let observed = self.so_far.saturating_add(len as u64);
        if let Some(limit) = self.tightest_ceiling() {
            if observed > limit {
                return Err(TransferError::SizeLimitExceeded { limit, observed });
            }
        }
        self.so_far = observed;
        Ok(())
    }

    /// Closes the budget at end of stream and returns the byte total.
    pub fn finish(&self) -> Result<u64> {
        match self.exact_size {
            Some(expected) if self.so_far != expected => Err(TransferError::SizeMismatch {
                expected,
                actual: self.so_far,
            }),
            _ => Ok(self.so_far),
        }
    }

    /// Checks a complete, already-known payload length.
    ///
    /// Unlike the streaming path, any difference from the exact size is a
    /// [`SizeMismatch`](TransferError::SizeMismatch), including overruns.
    pub fn check_static(&self, len: usize) -> Result<()> {
        let len = len as u64;
        if let Some(expected) = self.exact_size {
            if len != expected {
                return Err(TransferError::SizeMismatch {
                    expected,
                    actual: len,
                });
            }
        }
        if let Some(limit) = self.max_size {
            if len > limit {
                return Err(TransferError::SizeLimitExceeded {
                    limit,
                    observed: len,
                });
            }
        }
        Ok(())
    }

    /// Bytes accounted so far.
    pub fn so_far(&self) -> u64 {
        self.so_far
    }

    fn tightest_ceiling(&self) -> Option<u64> {
        match (self.max_size, self.exact_size) {
            (Some(max), Some(exact)) => Some(max.min(exact)),
            (max, exact) => max.or(exact),
        }
    }
}
