//! Write transfers: buffer or caller's source into a file.

use std::borrow::Cow;
use std::path::Path;

use fsguard_file_ops::{HandleProvider, OpenFlags};
use futures_util::Stream;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;

use crate::context::TransferContext;
use crate::encoding::TextEncoding;
use crate::engine::{FileTransfer, read_chunk};
use crate::record::{Operation, TransferRecord};
use crate::{Result, TransferError, TransferOptions, WRITE_BUFFER_SIZE};

/// Content for a static write.
///
/// Numbers are written in their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteInput<'a> {
    Bytes(Cow<'a, [u8]>),
    /// Converted to bytes with the transfer's text encoding (UTF-8 unless
    /// set otherwise).
    Text(Cow<'a, str>),
}

impl<'a> WriteInput<'a> {
    fn into_bytes(self, encoding: TextEncoding) -> Result<Cow<'a, [u8]>> {
        match (self, encoding) {
            (Self::Bytes(bytes), _) => Ok(bytes),
            (Self::Text(Cow::Borrowed(text)), TextEncoding::Utf8) => {
                Ok(Cow::Borrowed(text.as_bytes()))
            }
            (Self::Text(Cow::Owned(text)), TextEncoding::Utf8) => Ok(Cow::Owned(text.into_bytes())),
            (Self::Text(text), encoding) => encoding.encode(&text).map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a [u8]> for WriteInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for WriteInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes))
    }
}

impl<'a> From<&'a Vec<u8>> for WriteInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(Cow::Borrowed(bytes))
    }
}

impl From<Vec<u8>> for WriteInput<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Cow::Owned(bytes))
    }
}

impl<'a> From<&'a str> for WriteInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for WriteInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for WriteInput<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

macro_rules! numeric_input {
    ($($t:ty),*) => {
        $(
            impl From<$t> for WriteInput<'_> {
                fn from(value: $t) -> Self {
                    Self::Text(Cow::Owned(value.to_string()))
                }
            }
        )*
    };
}

numeric_input!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<P: HandleProvider> FileTransfer<P> {
    /// Writes a complete buffer or string to a file.
    ///
    /// Size limits and the content hash are checked before the file is
    /// opened, so a payload that cannot pass them never touches the disk.
    /// The payload is written in one go; a write that stops making
    /// progress is a [`TruncatedWrite`](TransferError::TruncatedWrite).
    pub async fn write<'a>(
        &self,
        path: impl AsRef<Path>,
        input: impl Into<WriteInput<'a>>,
        opts: &TransferOptions,
    ) -> Result<TransferRecord> {
        let path = path.as_ref();
        let input: WriteInput<'a> = input.into();
        let data = input.into_bytes(opts.text_encoding()?.unwrap_or_default())?;
        let mut ctx = TransferContext::new(Operation::Write, path, opts)?;
        ctx.seal_static(&data)?;

        let mut handle = self.open(path, &write_flags(opts), &mut ctx).await?;
        let outcome = write_whole(&mut handle, &data).await;
        self.settle_write(ctx, handle, outcome, path, opts).await
    }

    /// Streams `source` into a file.
    ///
    /// The source is only read again once the file side has taken the
    /// previous chunk; when the write buffer is full the source waits.
    /// Size limits are enforced per chunk; the exact size and the content
    /// hash are checked at end of stream, before the last buffered bytes
    /// are flushed.
    pub async fn write_from<R>(
        &self,
        path: impl AsRef<Path>,
        source: &mut R,
        opts: &TransferOptions,
    ) -> Result<TransferRecord>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let path = path.as_ref();
        let mut ctx = TransferContext::new(Operation::Write, path, opts)?;

        let handle = self.open(path, &write_flags(opts), &mut ctx).await?;
        tracing::debug!(path = %path.display(), "streaming source into file");

        let mut dest = BufWriter::with_capacity(WRITE_BUFFER_SIZE, handle);
        let mut buf = vec![0u8; opts.effective_chunk_size()];
        let outcome = async {
            while let Some(chunk) = read_chunk(source, &mut buf).await? {
                ctx.observe(chunk)?;
                dest.write_all(chunk).await.map_err(TransferError::Sink)?;
            }
            ctx.finalize()?;
            dest.flush().await.map_err(TransferError::Sink)
        }
        .await;

        // Unflushed bytes of a failed transfer are dropped here.
        let handle = dest.into_inner();
        self.settle_write(ctx, handle, outcome, path, opts).await
    }

    /// Streams a chunk stream into a file. See [`write_from`](Self::write_from).
    pub async fn write_from_stream<S, B, E>(
        &self,
        path: impl AsRef<Path>,
        stream: S,
        opts: &TransferOptions,
    ) -> Result<TransferRecord>
    where
        S: Stream<Item = std::result::Result<B, E>> + Unpin,
        B: bytes::Buf + Unpin,
        E: Into<std::io::Error>,
    {
        let mut reader = StreamReader::new(stream);
        self.write_from(path, &mut reader, opts).await
    }

    /// Closes the handle and resolves the transfer. Any failure from here
    /// or before removes the file when `unlink_on_error` is set.
    async fn settle_write(
        &self,
        mut ctx: TransferContext,
        handle: P::Handle,
        outcome: Result<()>,
        path: &Path,
        opts: &TransferOptions,
    ) -> Result<TransferRecord> {
        let result = match outcome {
            Ok(()) => match self.release(handle).await {
                Ok(()) => ctx.complete(),
                Err(e) => Err(ctx.fail(e)),
            },
            Err(e) => {
                let e = ctx.fail(e);
                self.discard(handle, path).await;
                Err(e)
            }
        };

        if result.is_err() && opts.unlink_on_error {
            self.unlink_partial(path).await;
        }
        result
    }
}

fn write_flags(opts: &TransferOptions) -> OpenFlags {
    OpenFlags::for_write(opts.exclusive, opts.append, opts.mode)
}

async fn write_whole<W>(dest: &mut W, data: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0;
    while written < data.len() {
        let n = dest
            .write(&data[written..])
            .await
            .map_err(TransferError::Sink)?;
        if n == 0 {
            return Err(TransferError::TruncatedWrite {
                written: written as u64,
                expected: data.len() as u64,
            });
        }
        written += n;
    }
    // File writes are queued; their errors surface on flush.
    dest.flush().await.map_err(TransferError::Sink)
}
