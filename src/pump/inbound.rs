//! Inbound reader: socket frames to bounded inbound messages.

use std::num::NonZeroUsize;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use super::{ErrorSender, report};
use crate::error::{CloseReason, TransportError};

/// Reads frames from `source` until the remote closes or `cancel` fires.
///
/// Text and binary payloads are published on `messages` in arrival order,
/// split into reads of at most `buffer_size` bytes. Control frames are not
/// published. Transient errors go to `errors` and reading continues; a
/// terminal error is reported once and ends the loop.
pub async fn run_inbound<S>(
    mut source: S,
    buffer_size: NonZeroUsize,
    messages: mpsc::UnboundedSender<Bytes>,
    errors: ErrorSender,
    cancel: CancellationToken,
) where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    tracing::debug!(buffer_size = buffer_size.get(), "inbound reader started");

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = source.next() => next,
        };

        match next {
            Some(Ok(msg @ (Message::Text(_) | Message::Binary(_)))) => {
                for read in bounded_reads(msg.into_data(), buffer_size) {
                    if messages.send(read).is_err() {
                        tracing::debug!("presenter gone, stopping inbound reader");
                        return;
                    }
                }
            }
            Some(Ok(Message::Close(frame))) => {
                report(&errors, TransportError::Closed(CloseReason::from_frame(frame)));
                break;
            }
            // Pings are answered by the protocol library.
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                let err = TransportError::classify(err);
                let terminal = err.is_terminal();
                report(&errors, err);
                if terminal {
                    break;
                }
            }
            None => {
                report(&errors, TransportError::Closed(CloseReason::EndOfStream));
                break;
            }
        }
    }

    tracing::debug!("inbound reader stopped");
}

/// Splits `payload` into consecutive reads of at most `limit` bytes.
///
/// An empty payload yields a single empty read.
#[must_use]
pub fn bounded_reads(mut payload: Bytes, limit: NonZeroUsize) -> Vec<Bytes> {
    let limit = limit.get();
    if payload.len() <= limit {
        return vec![payload];
    }
    let mut reads = Vec::with_capacity(payload.len().div_ceil(limit));
    while !payload.is_empty() {
        let n = payload.len().min(limit);
        reads.push(payload.split_to(n));
    }
    reads
}
