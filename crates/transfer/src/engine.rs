//! Plumbing shared by the read and write engines.

use std::path::Path;

use fsguard_file_ops::{HandleProvider, OpenFlags};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::context::TransferContext;
use crate::{Result, TransferError};

/// Runs transfers against a [`HandleProvider`].
///
/// Each operation opens exactly one handle and releases it exactly once,
/// whether the transfer succeeds or fails.
#[derive(Debug, Clone, Default)]
pub struct FileTransfer<P> {
    provider: P,
}

impl<P: HandleProvider> FileTransfer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub(crate) async fn open(
        &self,
        path: &Path,
        flags: &OpenFlags,
        ctx: &mut TransferContext,
    ) -> Result<P::Handle> {
        match self.provider.open(path, flags).await {
            Ok(handle) => {
                ctx.opened();
                Ok(handle)
            }
            Err(source) => Err(ctx.fail(TransferError::OpenFailed {
                path: path.to_path_buf(),
                source,
            })),
        }
    }

    /// Releases a handle after a successful transfer.
    pub(crate) async fn release(&self, handle: P::Handle) -> Result<()> {
        self.provider
            .close(handle)
            .await
            .map_err(TransferError::Close)
    }

    /// Releases a handle after a failed transfer. The close outcome is
    /// logged, never returned, so it cannot replace the original error.
    pub(crate) async fn discard(&self, handle: P::Handle, path: &Path) {
        if let Err(e) = self.provider.close(handle).await {
            tracing::warn!(path = %path.display(), error = %e, "close after failed transfer");
        }
    }

    /// Best-effort removal of a partially written file.
    pub(crate) async fn unlink_partial(&self, path: &Path) {
        match self.provider.unlink(path).await {
            Ok(()) => tracing::warn!(path = %path.display(), "removed partially written file"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to remove partially written file"
            ),
        }
    }
}

/// Pulls the next chunk from `source`. `None` is end of stream.
pub(crate) async fn read_chunk<'b, R>(source: &mut R, buf: &'b mut [u8]) -> Result<Option<&'b [u8]>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let n = source.read(buf).await.map_err(TransferError::Source)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(&buf[..n]))
}
