//! Size-checked, hash-verified streaming file transfers.
//!
//! A transfer moves the bytes of one file into memory or a caller's sink
//! ([`FileTransfer::read`], [`FileTransfer::read_to`]), or from a buffer or
//! a caller's source into a file ([`FileTransfer::write`],
//! [`FileTransfer::write_from`]). Every chunk passes a [`ByteBudget`] and
//! an optional [`ContentHasher`] in stream order; the slower side of the
//! transfer always paces the faster one.
//!
//! ```no_run
//! use fsguard_transfer::{TransferOptions, write_file};
//!
//! # async fn demo() -> fsguard_transfer::Result<()> {
//! let opts = TransferOptions::new().with_hash("sha256").with_max_size(1 << 20);
//! let record = write_file("out.txt", "hello", &opts).await?;
//! assert_eq!(record.size(), 5);
//! # Ok(())
//! # }
//! ```

mod accumulator;
mod budget;
mod context;
mod encoding;
mod engine;
mod error;
mod hash;
mod options;
mod read;
mod record;
mod write;

#[cfg(test)]
mod testutil;

use std::path::Path;

use fsguard_file_ops::TokioFs;
use tokio::io::{AsyncRead, AsyncWrite};

pub use accumulator::ChunkAccumulator;
pub use budget::ByteBudget;
pub use context::{TransferContext, TransferState};
pub use encoding::TextEncoding;
pub use engine::FileTransfer;
pub use error::{ErrorKind, Result, TransferError};
pub use hash::{ContentHasher, HashAlgorithm, digest_bytes, verify_digest};
pub use options::TransferOptions;
pub use read::{Content, ReadOutput};
pub use record::{Operation, TransferRecord};
pub use write::WriteInput;

pub use fsguard_file_ops::{HandleProvider, OpenFlags};

/// Default read granularity: 64 KiB.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Buffer in front of a file being written: 16 KiB.
///
/// A full buffer is what pauses the source.
pub const WRITE_BUFFER_SIZE: usize = 16 * 1024;

/// Largest segment [`ChunkAccumulator`] grows by merging: 128 KiB.
pub const MERGE_SEGMENT_SIZE: usize = 128 * 1024;

/// Segment count above which [`ChunkAccumulator`] coalesces.
pub const MAX_SEGMENTS: usize = 8;

/// Reads a whole file into memory. See [`FileTransfer::read`].
pub async fn read_file(path: impl AsRef<Path>, opts: &TransferOptions) -> Result<ReadOutput> {
    FileTransfer::new(TokioFs).read(path, opts).await
}

/// Streams a file into `sink`. See [`FileTransfer::read_to`].
pub async fn read_file_to<W>(
    path: impl AsRef<Path>,
    sink: &mut W,
    opts: &TransferOptions,
) -> Result<TransferRecord>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    FileTransfer::new(TokioFs).read_to(path, sink, opts).await
}

/// Writes a buffer or string to a file. See [`FileTransfer::write`].
pub async fn write_file<'a>(
    path: impl AsRef<Path>,
    input: impl Into<WriteInput<'a>>,
    opts: &TransferOptions,
) -> Result<TransferRecord> {
    FileTransfer::new(TokioFs).write(path, input, opts).await
}

/// Streams `source` into a file. See [`FileTransfer::write_from`].
pub async fn write_file_from<R>(
    path: impl AsRef<Path>,
    source: &mut R,
    opts: &TransferOptions,
) -> Result<TransferRecord>
where
    R: AsyncRead + Unpin + ?Sized,
{
    FileTransfer::new(TokioFs).write_from(path, source, opts).await
}

/// Streams a chunk stream into a file. See [`FileTransfer::write_from_stream`].
pub async fn write_file_from_stream<S, B, E>(
    path: impl AsRef<Path>,
    stream: S,
    opts: &TransferOptions,
) -> Result<TransferRecord>
where
    S: futures_util::Stream<Item = std::result::Result<B, E>> + Unpin,
    B: bytes::Buf + Unpin,
    E: Into<std::io::Error>,
{
    FileTransfer::new(TokioFs)
        .write_from_stream(path, stream, opts)
        .await
}
