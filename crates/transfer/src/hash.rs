//! Incremental content hashing.

use std::fmt;
use std::str::FromStr;

use sha2::Digest;

use crate::TransferError;

/// Hash functions a transfer can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    /// Canonical lowercase name, as recorded in a transfer record.
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }

    /// Length of the hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha224 => 56,
            Self::Sha256 | Self::Blake3 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "");
        match normalized.as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "blake3" => Ok(Self::Blake3),
            _ => Err(TransferError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Running digest over the chunks of one transfer.
///
/// Chunks must be fed in stream order. [`finalize`](Self::finalize)
/// consumes the hasher.
pub struct ContentHasher {
    algorithm: HashAlgorithm,
    state: HasherState,
}

enum HasherState {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl ContentHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Md5 => HasherState::Md5(md5::Md5::new()),
            HashAlgorithm::Sha1 => HasherState::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha224 => HasherState::Sha224(sha2::Sha224::new()),
            HashAlgorithm::Sha256 => HasherState::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha384 => HasherState::Sha384(sha2::Sha384::new()),
            HashAlgorithm::Sha512 => HasherState::Sha512(sha2::Sha512::new()),
            HashAlgorithm::Blake3 => HasherState::Blake3(Box::new(blake3::Hasher::new())),
        };
        Self { algorithm, state }
    }

    /// Builds a hasher from an algorithm name.
    pub fn from_name(name: &str) -> Result<Self, TransferError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn update(&mut self, chunk: &[u8]) {
        match &mut self.state {
            HasherState::Md5(h) => h.update(chunk),
            HasherState::Sha1(h) => h.update(chunk),
            HasherState::Sha224(h) => h.update(chunk),
            HasherState::Sha256(h) => h.update(chunk),
            HasherState::Sha384(h) => h.update(chunk),
            HasherState::Sha512(h) => h.update(chunk),
            HasherState::Blake3(h) => {
                h.update(chunk);
            }
        }
    }

    /// Returns the lowercase hex digest.
    pub fn finalize(self) -> String {
        match self.state {
            HasherState::Md5(h) => hex::encode(h.finalize()),
            HasherState::Sha1(h) => hex::encode(h.finalize()),
            HasherState::Sha224(h) => hex::encode(h.finalize()),
            HasherState::Sha256(h) => hex::encode(h.finalize()),
            HasherState::Sha384(h) => hex::encode(h.finalize()),
            HasherState::Sha512(h) => hex::encode(h.finalize()),
            HasherState::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

impl fmt::Debug for ContentHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentHasher")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Computes the hex digest of a complete buffer.
pub fn digest_bytes(algorithm: HashAlgorithm, data: &[u8]) -> String {
    let mut hasher = ContentHasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}

/// Compares an expected digest against a computed one.
///
/// The comparison is exact: an uppercase expected digest does not match.
pub fn verify_digest(expected: Option<&str>, actual: String) -> Result<String, TransferError> {
    match expected {
        Some(expected) if expected != actual => Err(TransferError::ContentHashMismatch {
            expected: expected.to_string(),
            actual,
        }),
        _ => Ok(actual),
    }
}
