//! Connection handle: dialing and the two halves of a live WebSocket.
//!
//! The session owns a [`Connection`] and splits it once. The read half goes
//! to the inbound reader, the write half to the outbound writer (or stays
//! with the session in raw mode). [`close`] consumes the write half, so the
//! connection is closed at most once; dropping both halves releases the
//! socket on every other path.

pub mod dial;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub use dial::dial;

/// Concrete stream type returned by the handshake.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of a live connection.
pub type WsSink = SplitSink<WsStream, Message>;

/// Read half of a live connection.
pub type WsSource = SplitStream<WsStream>;

/// A dialed WebSocket connection, not yet split.
#[derive(Debug)]
pub struct Connection {
    stream: WsStream,
}

impl Connection {
    pub(crate) const fn new(stream: WsStream) -> Self {
        Self { stream }
    }

    /// Splits the connection into its write and read halves.
    #[must_use]
    pub fn split(self) -> (WsSink, WsSource) {
        self.stream.split()
    }
}

/// Sends a Close frame and flushes the write half.
///
/// Failures are logged, not returned: the remote may already be gone.
pub async fn close<S>(mut sink: S)
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    match sink.close().await {
        Ok(()) => tracing::debug!("connection closed"),
        Err(err) => tracing::debug!(error = %err, "close after remote shutdown"),
    }
}
