//! Read transfers: file into memory or into a caller's sink.

use std::path::Path;

use fsguard_file_ops::{HandleProvider, OpenFlags};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::accumulator::ChunkAccumulator;
use crate::context::TransferContext;
use crate::engine::{FileTransfer, read_chunk};
use crate::record::{Operation, TransferRecord};
use crate::{Result, TransferError, TransferOptions};

/// Payload of a buffered read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Bytes(Vec<u8>),
    /// Decoded with the requested text encoding.
    Text(String),
}

impl Content {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Bytes(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }
}

/// Result of [`FileTransfer::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutput {
    pub record: TransferRecord,
    pub content: Content,
}

impl<P: HandleProvider> FileTransfer<P> {
    /// Reads a whole file into memory.
    ///
    /// The file is pulled in chunks; each chunk is checked against the
    /// size limits before it is buffered, so an oversized file fails on
    /// the first chunk past the limit. With a text encoding the content is
    /// returned as [`Content::Text`].
    pub async fn read(&self, path: impl AsRef<Path>, opts: &TransferOptions) -> Result<ReadOutput> {
        let path = path.as_ref();
        let encoding = opts.text_encoding()?;
        let mut ctx = TransferContext::new(Operation::Read, path, opts)?;

        let mut handle = self.open(path, &OpenFlags::read_only(), &mut ctx).await?;
        tracing::debug!(path = %path.display(), "reading file into memory");

        let mut buffer = ChunkAccumulator::new();
        let mut buf = vec![0u8; opts.effective_chunk_size()];
        let outcome = async {
            while let Some(chunk) = read_chunk(&mut handle, &mut buf).await? {
                ctx.observe(chunk)?;
                buffer.push(chunk);
            }
            ctx.finalize()
        }
        .await;

        if let Err(e) = outcome {
            let e = ctx.fail(e);
            self.discard(handle, path).await;
            return Err(e);
        }
        if let Err(e) = self.release(handle).await {
            return Err(ctx.fail(e));
        }

        let record = ctx.complete()?;
        let bytes = buffer.finalize();
        let content = match encoding {
            Some(encoding) => Content::Text(encoding.decode(bytes)),
            None => Content::Bytes(bytes),
        };
        Ok(ReadOutput { record, content })
    }

    /// Streams a file into `sink`.
    ///
    /// A chunk is only pulled from the file once the sink accepted the
    /// previous one, so a slow sink paces the read. At end of file the
    /// sink is shut down, and the transfer completes once the shutdown
    /// has finished. The sink is not shut down when the transfer fails.
    pub async fn read_to<W>(
        &self,
        path: impl AsRef<Path>,
        sink: &mut W,
        opts: &TransferOptions,
    ) -> Result<TransferRecord>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let path = path.as_ref();
        if let Some(encoding) = &opts.text_encoding {
            return Err(TransferError::InvalidSink(format!(
                "text encoding {encoding:?} applies to buffered reads only"
            )));
        }
        let mut ctx = TransferContext::new(Operation::Read, path, opts)?;

        let mut handle = self.open(path, &OpenFlags::read_only(), &mut ctx).await?;
        tracing::debug!(path = %path.display(), "streaming file into sink");

        let mut buf = vec![0u8; opts.effective_chunk_size()];
        let outcome = async {
            while let Some(chunk) = read_chunk(&mut handle, &mut buf).await? {
                ctx.observe(chunk)?;
                sink.write_all(chunk).await.map_err(TransferError::Sink)?;
            }
            ctx.finalize()?;
            sink.shutdown().await.map_err(TransferError::Sink)
        }
        .await;

        if let Err(e) = outcome {
            let e = ctx.fail(e);
            self.discard(handle, path).await;
            return Err(e);
        }
        if let Err(e) = self.release(handle).await {
            return Err(ctx.fail(e));
        }
        ctx.complete()
    }
}
