//! Transfer error types.

use std::io;
use std::path::PathBuf;

/// Errors produced by a transfer.
///
/// A failed transfer reports exactly one of these: the first failure it hit.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid sink: {0}")]
    InvalidSink(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("expected content hash given without a content hash algorithm")]
    InconsistentHashOptions,

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("failed to open {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("size limit exceeded: {observed} bytes > {limit} bytes")]
    SizeLimitExceeded { limit: u64, observed: u64 },

    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("content hash mismatch: expected {expected}, got {actual}")]
    ContentHashMismatch { expected: String, actual: String },

    #[error("truncated write: {written} of {expected} bytes written")]
    TruncatedWrite { written: u64, expected: u64 },

    #[error("sink error: {0}")]
    Sink(#[source] io::Error),

    #[error("source error: {0}")]
    Source(#[source] io::Error),

    #[error("close failed: {0}")]
    Close(#[source] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Fieldless discriminant of [`TransferError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSink,
    InvalidInput,
    InconsistentHashOptions,
    UnsupportedAlgorithm,
    UnsupportedEncoding,
    OpenFailed,
    SizeLimitExceeded,
    SizeMismatch,
    ContentHashMismatch,
    TruncatedWrite,
    Sink,
    Source,
    Close,
    Json,
    Internal,
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSink(_) => ErrorKind::InvalidSink,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::InconsistentHashOptions => ErrorKind::InconsistentHashOptions,
            Self::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Self::UnsupportedEncoding(_) => ErrorKind::UnsupportedEncoding,
            Self::OpenFailed { .. } => ErrorKind::OpenFailed,
            Self::SizeLimitExceeded { .. } => ErrorKind::SizeLimitExceeded,
            Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::ContentHashMismatch { .. } => ErrorKind::ContentHashMismatch,
            Self::TruncatedWrite { .. } => ErrorKind::TruncatedWrite,
            Self::Sink(_) => ErrorKind::Sink,
            Self::Source(_) => ErrorKind::Source,
            Self::Close(_) => ErrorKind::Close,
            Self::Json(_) => ErrorKind::Json,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns `true` for failures raised before any file was opened.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidSink
                | ErrorKind::InvalidInput
                | ErrorKind::InconsistentHashOptions
                | ErrorKind::UnsupportedAlgorithm
                | ErrorKind::UnsupportedEncoding
        )
    }
}

/// Result alias for transfer operations.
pub type Result<T> = std::result::Result<T, TransferError>;
