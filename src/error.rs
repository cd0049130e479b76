//! Client error types.
//!
//! Two families:
//!
//! - [`ClientError`]: fatal startup failures (bad request, TLS setup,
//!   handshake rejection). The process aborts before any task starts.
//! - [`TransportError`]: runtime failures observed by the inbound reader or
//!   the outbound writer. Every one of them is funneled into the error sink,
//!   which uses [`TransportError::is_terminal`] to decide between
//!   report-and-continue and ending the session.

use std::fmt;
use std::io;

use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;

/// Fatal error raised before or outside the message pump.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A handshake header could not be encoded.
    #[error("invalid {name} header value: {value:?}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// The TLS connector could not be built.
    #[error("tls setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    /// Dialing or the WebSocket handshake failed.
    #[error("failed to connect to {url}: {source}")]
    Dial {
        /// Target endpoint.
        url: String,
        /// Underlying protocol error.
        #[source]
        source: tungstenite::Error,
    },

    /// Terminal I/O failed.
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Why the remote side ended the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The stream ended without a Close frame.
    EndOfStream,
    /// The remote sent a Close frame.
    Frame {
        /// WebSocket close code.
        code: u16,
        /// Close reason text (may be empty).
        reason: String,
    },
}

impl CloseReason {
    /// Builds a reason from a received Close frame payload.
    #[must_use]
    pub fn from_frame(frame: Option<CloseFrame>) -> Self {
        match frame {
            Some(frame) => Self::Frame {
                code: frame.code.into(),
                reason: frame.reason.to_string(),
            },
            None => Self::EndOfStream,
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream => f.write_str("EOF"),
            Self::Frame { code, reason } if reason.is_empty() => write!(f, "{code}"),
            Self::Frame { code, reason } => write!(f, "{code} {reason}"),
        }
    }
}

/// Runtime failure reported by the inbound reader or outbound writer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The remote closed the connection. Ends the session.
    #[error("{0}")]
    Closed(CloseReason),

    /// Any other I/O or protocol failure. Reported, then ignored.
    #[error("{0}")]
    Transient(tungstenite::Error),
}

impl TransportError {
    /// Sorts a protocol library error into terminal or transient.
    #[must_use]
    pub fn classify(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
                Self::Closed(CloseReason::EndOfStream)
            }
            tungstenite::Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Self::Closed(CloseReason::EndOfStream)
            }
            other => Self::Transient(other),
        }
    }

    /// Returns `true` if this error ends the session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}
