//! Per-transfer state machine.

use std::path::{Path, PathBuf};

use crate::budget::ByteBudget;
use crate::hash::{ContentHasher, verify_digest};
use crate::options::TransferOptions;
use crate::record::{Operation, TransferRecord};
use crate::{Result, TransferError};

/// Lifecycle of a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Validated, waiting for the file to open.
    Opening,
    /// Chunks are flowing.
    Transferring,
    /// End of stream seen; size and hash are being checked.
    Finalizing,
    /// Completed successfully.
    Closed,
    /// Torn down after an error.
    Failed,
}

/// Size and digest fixed once the content is complete.
#[derive(Debug)]
struct Sealed {
    size: u64,
    hash: Option<(String, String)>,
}

/// Owns the byte budget and hasher of one transfer and enforces the order
/// in which they are used.
///
/// Chunks are only accepted in [`TransferState::Transferring`]; anything
/// delivered after the transfer was torn down is refused rather than
/// counted or hashed.
#[derive(Debug)]
pub struct TransferContext {
    operation: Operation,
    path: PathBuf,
    state: TransferState,
    budget: ByteBudget,
    hasher: Option<ContentHasher>,
    expected_hash: Option<String>,
    sealed: Option<Sealed>,
}

impl TransferContext {
    /// Validates `opts` and prepares a transfer. No I/O happens here.
    pub fn new(operation: Operation, path: &Path, opts: &TransferOptions) -> Result<Self> {
        let hasher = opts.hasher()?;
        Ok(Self {
            operation,
            path: path.to_path_buf(),
            state: TransferState::Opening,
            budget: ByteBudget::new(opts.max_size, opts.exact_size),
            hasher,
            expected_hash: opts.expected_content_hash.clone(),
            sealed: None,
        })
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Returns `true` while chunks are accepted.
    pub fn is_active(&self) -> bool {
        self.state == TransferState::Transferring
    }

    pub fn bytes_so_far(&self) -> u64 {
        self.budget.so_far()
    }

    /// Records that the file handle is open.
    pub fn opened(&mut self) {
        if self.state == TransferState::Opening {
            self.transition(TransferState::Transferring);
        }
    }

    /// Applies the byte budget and hash to the next chunk in stream order.
    pub fn observe(&mut self, chunk: &[u8]) -> Result<()> {
        if !self.is_active() {
            return Err(TransferError::Internal("chunk delivered outside transfer"));
        }
        if let Err(e) = self.budget.observe(chunk.len()) {
            return Err(self.fail(e));
        }
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(chunk);
        }
        Ok(())
    }

    /// Checks and hashes a payload whose full content is known up front.
    ///
    /// Must run before the file is opened.
    pub fn seal_static(&mut self, data: &[u8]) -> Result<()> {
        if self.state != TransferState::Opening {
            return Err(TransferError::Internal("static payload sealed after open"));
        }
        if let Err(e) = self.budget.check_static(data.len()) {
            return Err(self.fail(e));
        }
        let hash = match self.hasher.take() {
            Some(mut hasher) => {
                hasher.update(data);
                Some(self.verify(hasher)?)
            }
            None => None,
        };
        self.sealed = Some(Sealed {
            size: data.len() as u64,
            hash,
        });
        Ok(())
    }

    /// Closes the stream side: checks the final size and the digest.
    pub fn finalize(&mut self) -> Result<u64> {
        if !self.is_active() {
            return Err(TransferError::Internal("finalize outside transfer"));
        }
        self.transition(TransferState::Finalizing);

        let size = match self.budget.finish() {
            Ok(size) => size,
            Err(e) => return Err(self.fail(e)),
        };
        let hash = match self.hasher.take() {
            Some(hasher) => Some(self.verify(hasher)?),
            None => None,
        };
        self.sealed = Some(Sealed { size, hash });
        Ok(size)
    }

    /// Produces the record of a successful transfer.
    pub fn complete(mut self) -> Result<TransferRecord> {
        if !matches!(
            self.state,
            TransferState::Transferring | TransferState::Finalizing
        ) {
            return Err(TransferError::Internal("complete outside transfer"));
        }
        let Some(sealed) = self.sealed.take() else {
            return Err(TransferError::Internal("complete before content was sealed"));
        };
        self.transition(TransferState::Closed);

        tracing::info!(
            op = ?self.operation,
            path = %self.path.display(),
            size = sealed.size,
            hash = sealed.hash.as_ref().map(|(_, digest)| digest.as_str()),
            "transfer complete"
        );
        Ok(TransferRecord::new(
            self.operation,
            self.path,
            sealed.size,
            sealed.hash,
        ))
    }

    /// Marks the transfer failed and hands the error back.
    pub fn fail(&mut self, err: TransferError) -> TransferError {
        if self.state != TransferState::Failed {
            self.transition(TransferState::Failed);
            tracing::debug!(
                op = ?self.operation,
                path = %self.path.display(),
                bytes = self.budget.so_far(),
                error = %err,
                "transfer failed"
            );
        }
        err
    }

    fn verify(&mut self, hasher: ContentHasher) -> Result<(String, String)> {
        let algorithm = hasher.algorithm();
        match verify_digest(self.expected_hash.as_deref(), hasher.finalize()) {
            Ok(digest) => Ok((algorithm.name().to_string(), digest)),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn transition(&mut self, next: TransferState) {
        tracing::trace!(
            path = %self.path.display(),
            from = ?self.state,
            to = ?next,
            "transfer state"
        );
        self.state = next;
    }
}
