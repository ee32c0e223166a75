//! The handle provider seam and its tokio implementation.

use std::future::Future;
use std::io;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::OpenFlags;

/// Opens, closes and unlinks files on behalf of a transfer.
///
/// Every call completes asynchronously and fails with the OS error.
/// [`close`](Self::close) consumes the handle, so a handle is released at
/// most once.
pub trait HandleProvider {
    /// An open file.
    type Handle: AsyncRead + AsyncWrite + Unpin + Send;

    fn open(
        &self,
        path: &Path,
        flags: &OpenFlags,
    ) -> impl Future<Output = io::Result<Self::Handle>> + Send;

    fn close(&self, handle: Self::Handle) -> impl Future<Output = io::Result<()>> + Send;

    fn unlink(&self, path: &Path) -> impl Future<Output = io::Result<()>> + Send;
}

/// [`HandleProvider`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

impl HandleProvider for TokioFs {
    type Handle = tokio::fs::File;

    async fn open(&self, path: &Path, flags: &OpenFlags) -> io::Result<Self::Handle> {
        let file = flags.to_open_options().open(path).await?;
        tracing::debug!(path = %path.display(), ?flags, "opened file");
        Ok(file)
    }

    async fn close(&self, mut handle: Self::Handle) -> io::Result<()> {
        // tokio hands writes to a blocking pool; flushing waits for the last
        // one so its error is not lost when the file is dropped.
        handle.flush().await?;
        drop(handle);
        Ok(())
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await?;
        tracing::debug!(path = %path.display(), "unlinked file");
        Ok(())
    }
}
