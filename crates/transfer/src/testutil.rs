//! Test doubles for providers, sinks and sources.

use std::io;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use fsguard_file_ops::{HandleProvider, OpenFlags, TokioFs};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// [`TokioFs`] that counts successful opens, closes and unlink attempts.
#[derive(Debug, Clone, Default)]
pub struct CountingFs {
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    unlinked: Arc<AtomicUsize>,
    refuse_unlink: bool,
    fail_close: bool,
}

impl CountingFs {
    /// Every unlink fails with `PermissionDenied` and leaves the file.
    pub fn refusing_unlink() -> Self {
        Self {
            refuse_unlink: true,
            ..Self::default()
        }
    }

    /// Every close fails with `BrokenPipe` after dropping the handle.
    pub fn failing_close() -> Self {
        Self {
            fail_close: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn unlinked(&self) -> usize {
        self.unlinked.load(Ordering::SeqCst)
    }
}

impl HandleProvider for CountingFs {
    type Handle = tokio::fs::File;

    async fn open(&self, path: &Path, flags: &OpenFlags) -> io::Result<Self::Handle> {
        let handle = TokioFs.open(path, flags).await?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }

    async fn close(&self, handle: Self::Handle) -> io::Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            drop(handle);
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "close failed"));
        }
        TokioFs.close(handle).await
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        self.unlinked.fetch_add(1, Ordering::SeqCst);
        if self.refuse_unlink {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "unlink refused",
            ));
        }
        TokioFs.unlink(path).await
    }
}

/// Sink that is full on every other poll.
#[derive(Debug, Default)]
pub struct SaturatedSink {
    pub chunks: Vec<Vec<u8>>,
    pub stalls: usize,
    pub finished: bool,
    ready: bool,
}

impl AsyncWrite for SaturatedSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if !self.ready {
            self.ready = true;
            self.stalls += 1;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        self.ready = false;
        self.chunks.push(buf.to_vec());
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.finished = true;
        Poll::Ready(Ok(()))
    }
}

/// Sink that accepts `limit` bytes and then errors.
#[derive(Debug)]
pub struct FailingSink {
    pub accepted: usize,
    limit: usize,
}

impl FailingSink {
    pub fn after(limit: usize) -> Self {
        Self { accepted: 0, limit }
    }
}

impl AsyncWrite for FailingSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.accepted >= self.limit {
            return Poll::Ready(Err(io::Error::other("sink broke")));
        }
        let n = buf.len().min(self.limit - self.accepted);
        self.accepted += n;
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Writer that never makes progress.
#[derive(Debug)]
pub struct ZeroWriter;

impl AsyncWrite for ZeroWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(0))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Writer that accepts every byte but fails to flush.
#[derive(Debug, Default)]
pub struct UnflushableWriter {
    pub accepted: usize,
}

impl AsyncWrite for UnflushableWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.accepted += buf.len();
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::StorageFull,
            "no space left on device",
        )))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Source that yields one chunk and then errors.
#[derive(Debug)]
pub struct FailingSource {
    data: Vec<u8>,
    served: bool,
}

impl FailingSource {
    pub fn after(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            served: false,
        }
    }
}

impl AsyncRead for FailingSource {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.served {
            return Poll::Ready(Err(io::Error::other("source broke")));
        }
        self.served = true;
        let n = self.data.len().min(buf.remaining());
        buf.put_slice(&self.data[..n]);
        Poll::Ready(Ok(()))
    }
}
