//! Error sink: the single place that decides what a transport error means.
//!
//! - Transient error: print it, redraw the prompt in interactive mode, keep
//!   going.
//! - Remote closure: print the closure notice, cancel the session and stop.
//!
//! The sink never exits the process itself; the session observes the
//! cancellation and shuts down.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{CloseReason, TransportError};
use crate::render::Renderer;

/// Consumes transport errors until a terminal one arrives or every producer
/// has finished.
///
/// Returns the close reason when the remote ended the connection.
pub async fn run_error_sink<E, O>(
    mut errors: mpsc::UnboundedReceiver<TransportError>,
    mut stderr: E,
    mut stdout: O,
    renderer: Renderer,
    cancel: CancellationToken,
) -> Option<CloseReason>
where
    E: AsyncWrite + Unpin,
    O: AsyncWrite + Unpin,
{
    while let Some(err) = errors.recv().await {
        match err {
            TransportError::Closed(reason) => {
                tracing::debug!(%reason, "remote closed connection");
                cancel.cancel();
                emit(&mut stderr, renderer.closed_by_remote(&reason).as_bytes()).await;
                return Some(reason);
            }
            TransportError::Transient(err) => {
                tracing::debug!(error = ?err, "transient transport error");
                emit(&mut stderr, renderer.transient_error(&err).as_bytes()).await;
                if let Some(prompt) = renderer.prompt() {
                    emit(&mut stdout, prompt.as_bytes()).await;
                }
            }
        }
    }
    None
}

async fn emit<W: AsyncWrite + Unpin>(out: &mut W, bytes: &[u8]) {
    let written = async {
        out.write_all(bytes).await?;
        out.flush().await
    };
    if let Err(err) = written.await {
        tracing::warn!(error = %err, "failed to write to terminal");
    }
}
