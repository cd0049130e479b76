//! Message presenter: inbound messages to stdout.

use std::io;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::render::Renderer;

/// Renders every inbound message to `out` in arrival order.
///
/// Ends when the inbound queue is closed and drained, returning the writer.
///
/// # Errors
///
/// Returns the first write or flush failure on `out`.
pub async fn run_presenter<W>(
    mut messages: mpsc::UnboundedReceiver<Bytes>,
    mut out: W,
    renderer: Renderer,
) -> io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(payload) = messages.recv().await {
        out.write_all(&renderer.received(&payload)).await?;
        out.flush().await?;
    }
    Ok(out)
}
