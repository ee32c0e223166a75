//! The result of a successful transfer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Write,
}

/// Describes a completed transfer.
///
/// Only built once a transfer has succeeded; a failed transfer yields an
/// error and no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    operation: Operation,
    path: PathBuf,
    size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_hash_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_hash: Option<String>,
}

impl TransferRecord {
    pub(crate) fn new(
        operation: Operation,
        path: PathBuf,
        size: u64,
        content_hash: Option<(String, String)>,
    ) -> Self {
        let (content_hash_algorithm, content_hash) = content_hash.unzip();
        Self {
            operation,
            path,
            size,
            content_hash_algorithm,
            content_hash,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes transferred.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Name of the hash function, when one was requested.
    pub fn content_hash_algorithm(&self) -> Option<&str> {
        self.content_hash_algorithm.as_deref()
    }

    /// Lowercase hex digest of the transferred bytes.
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }
}
