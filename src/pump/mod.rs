//! The connection message pump.
//!
//! ```text
//!  stdin ──► input loop ──► [outbound queue] ──► outbound writer ──► socket
//!  socket ──► inbound reader ──► [inbound queue] ──► presenter ──► stdout
//!                 │
//!                 └──────────► [error queue] ◄──── outbound writer
//!                                   │
//!                                   ▼
//!                              error sink ──► stderr (+ cancel on remote close)
//! ```
//!
//! Each stage is a single-purpose task. Queues are unbounded `tokio` mpsc
//! channels, so per-direction FIFO order holds and no producer waits on a
//! slow consumer. The only writer to the socket is the outbound writer and
//! the only reader is the inbound reader.

pub mod errors;
pub mod inbound;
pub mod input;
pub mod outbound;
pub mod presenter;

use tokio::sync::mpsc;

use crate::error::TransportError;

pub use errors::run_error_sink;
pub use inbound::run_inbound;
pub use input::{InputEnd, run_input};
pub use outbound::run_outbound;
pub use presenter::run_presenter;

/// Sending side of the error queue shared by the reader and the writer.
pub type ErrorSender = mpsc::UnboundedSender<TransportError>;

/// Hands `err` to the error sink.
fn report(errors: &ErrorSender, err: TransportError) {
    if let Err(mpsc::error::SendError(err)) = errors.send(err) {
        tracing::debug!(error = %err, "error sink gone, dropping error");
    }
}
