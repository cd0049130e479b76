//! Operator input loop: stdin lines to the outbound queue.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::render::PROMPT;

/// Why the input loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// End of input (or an unreadable input stream).
    Exhausted,
    /// The session was cancelled while waiting for a line.
    Cancelled,
}

/// Reads `input` line by line and queues each line on `outbound`.
///
/// Prints [`PROMPT`] to `prompt_out` before every read. Only the line
/// terminator (`\n` or `\r\n`) is stripped. Runs on the caller's task.
pub async fn run_input<R, W>(
    input: R,
    mut prompt_out: W,
    outbound: mpsc::UnboundedSender<String>,
    cancel: &CancellationToken,
) -> InputEnd
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();

    loop {
        prompt(&mut prompt_out).await;

        buf.clear();
        let read = tokio::select! {
            biased;
            () = cancel.cancelled() => return InputEnd::Cancelled,
            read = reader.read_until(b'\n', &mut buf) => read,
        };

        match read {
            Ok(0) => return InputEnd::Exhausted,
            Ok(_) => {
                if outbound.send(decode_line(&buf)).is_err() {
                    tracing::debug!("outbound writer gone, stopping input");
                    return InputEnd::Cancelled;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read input");
                return InputEnd::Exhausted;
            }
        }
    }
}

async fn prompt<W: AsyncWrite + Unpin>(out: &mut W) {
    let written = async {
        out.write_all(PROMPT.as_bytes()).await?;
        out.flush().await
    };
    if let Err(err) = written.await {
        tracing::debug!(error = %err, "failed to draw prompt");
    }
}

/// Strips the line terminator and decodes the rest as text.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
