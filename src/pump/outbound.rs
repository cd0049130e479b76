//! Outbound writer: operator lines to text frames.

use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use super::{ErrorSender, report};
use crate::error::TransportError;

/// Writes each queued line to `sink` as a text frame, in submission order.
///
/// Runs until `queue` is closed and drained, or until `cancel` fires (queued
/// lines are then discarded). A failed write is reported to `errors` and the
/// next line is still attempted. Returns the sink so the caller can close
/// the connection.
pub async fn run_outbound<S>(
    mut sink: S,
    mut queue: mpsc::UnboundedReceiver<String>,
    errors: ErrorSender,
    cancel: CancellationToken,
) -> S
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    tracing::debug!("outbound writer started");

    loop {
        let line = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            line = queue.recv() => match line {
                Some(line) => line,
                None => break,
            },
        };

        if let Err(err) = sink.send(Message::text(line)).await {
            report(&errors, TransportError::classify(err));
        }
    }

    tracing::debug!(discarded = queue.len(), "outbound writer stopped");
    sink
}
