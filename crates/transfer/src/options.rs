//! Per-transfer options.

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::hash::ContentHasher;
use crate::{READ_CHUNK_SIZE, Result, TransferError};

/// Constraints and behaviors for one read or write transfer.
///
/// Loadable from JSON (camelCase keys, every field optional):
///
/// ```
/// # use fsguard_transfer::TransferOptions;
/// let opts = TransferOptions::from_json(
///     r#"{"maxSize": 1048576, "contentHashAlgorithm": "sha256"}"#,
/// ).unwrap();
/// assert_eq!(opts.max_size, Some(1_048_576));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferOptions {
    /// Hard ceiling on transferred bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// The transfer must move exactly this many bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash_algorithm: Option<String>,
    /// Hex digest the content must hash to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_content_hash: Option<String>,
    /// Decode buffered reads to text, or encode text input on writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_encoding: Option<String>,
    /// Writes only: remove the file if the transfer fails after opening it.
    pub unlink_on_error: bool,
    /// Writes only: fail if the file already exists.
    pub exclusive: bool,
    /// Writes only: append instead of truncating.
    pub append: bool,
    /// Writes only: permission bits for a newly created file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    /// Read granularity in bytes; zero or absent means [`READ_CHUNK_SIZE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
}

impl TransferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_exact_size(mut self, exact_size: u64) -> Self {
        self.exact_size = Some(exact_size);
        self
    }

    pub fn with_hash(mut self, algorithm: impl Into<String>) -> Self {
        self.content_hash_algorithm = Some(algorithm.into());
        self
    }

    pub fn with_expected_hash(mut self, digest: impl Into<String>) -> Self {
        self.expected_content_hash = Some(digest.into());
        self
    }

    pub fn with_text_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.text_encoding = Some(encoding.into());
        self
    }

    pub fn with_unlink_on_error(mut self, unlink: bool) -> Self {
        self.unlink_on_error = unlink;
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    pub(crate) fn effective_chunk_size(&self) -> usize {
        match self.chunk_size {
            Some(n) if n > 0 => n,
            _ => READ_CHUNK_SIZE,
        }
    }

    pub(crate) fn text_encoding(&self) -> Result<Option<TextEncoding>> {
        self.text_encoding.as_deref().map(str::parse).transpose()
    }

    /// Builds the hasher these options ask for, if any.
    pub(crate) fn hasher(&self) -> Result<Option<ContentHasher>> {
        match (&self.content_hash_algorithm, &self.expected_content_hash) {
            (None, Some(_)) => Err(TransferError::InconsistentHashOptions),
            (None, None) => Ok(None),
            (Some(name), _) => ContentHasher::from_name(name).map(Some),
        }
    }
}
