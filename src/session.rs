//! Session orchestrator.
//!
//! Owns the connection for the lifetime of one invocation: dials, wires the
//! pump tasks for the configured [`RenderMode`], waits for the session to end
//! and shuts everything down in a fixed order:
//!
//! 1. stop accepting operator input (end of input, interrupt or remote close)
//! 2. drain the outbound queue, unless the session was cancelled
//! 3. close the connection (exactly once, through the returned write half)
//! 4. cancel the inbound reader; after end of input it first keeps reading
//!    until the remote acknowledges the close (or the operator interrupts)
//! 5. join the presenter and the error sink so queued output is flushed

use std::future::Future;

use futures_util::{Sink, Stream};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, RenderMode};
use crate::console::Console;
use crate::error::{ClientError, CloseReason};
use crate::pump;
use crate::render::Renderer;
use crate::transport;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The remote closed the connection.
    RemoteClosed(CloseReason),
    /// The operator input reached end of input.
    InputExhausted,
    /// The operator interrupted the session.
    Interrupted,
}

impl SessionOutcome {
    /// Process exit status for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::RemoteClosed(_) | Self::InputExhausted => 0,
            Self::Interrupted => 130,
        }
    }
}

/// A single client session against one endpoint.
#[derive(Debug)]
pub struct Session<C> {
    config: ClientConfig,
    console: C,
    renderer: Renderer,
}

impl<C: Console> Session<C> {
    /// Creates a session that renders to `console`.
    #[must_use]
    pub fn new(config: ClientConfig, console: C) -> Self {
        let renderer = Renderer::new(config.render_mode, config.color);
        Self {
            config,
            console,
            renderer,
        }
    }

    /// Dials the endpoint and runs the session to completion.
    ///
    /// `input` is only read in interactive mode. `interrupt` resolving ends
    /// the session with [`SessionOutcome::Interrupted`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the connection cannot be established or
    /// the banner cannot be written. No task has been started in that case.
    pub async fn run<R, F>(self, input: R, interrupt: F) -> Result<SessionOutcome, ClientError>
    where
        R: AsyncRead + Unpin,
        F: Future<Output = ()>,
    {
        let mut stdout = self.console.stdout();
        let interactive = self.config.render_mode == RenderMode::Interactive;

        if interactive {
            let banner = self.renderer.dialing(
                &self.config.url,
                self.config.subprotocol.as_deref(),
                &self.config.origin,
            );
            write_banner(&mut stdout, &banner).await?;
        }

        let connection = transport::dial(&self.config).await?;
        tracing::info!(url = %self.config.url, "connected");

        if interactive {
            write_banner(&mut stdout, &self.renderer.connected(&self.config.url)).await?;
        }

        let (sink, source) = connection.split();
        Ok(self.pump(sink, source, input, interrupt).await)
    }

    /// Runs the message pump over an already established connection.
    pub async fn pump<Si, So, R, F>(
        &self,
        sink: Si,
        source: So,
        input: R,
        interrupt: F,
    ) -> SessionOutcome
    where
        Si: Sink<Message, Error = tungstenite::Error> + Unpin + Send + 'static,
        So: Stream<Item = Result<Message, tungstenite::Error>> + Unpin + Send + 'static,
        R: AsyncRead + Unpin,
        F: Future<Output = ()>,
    {
        let cancel = CancellationToken::new();
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let error_sink = tokio::spawn(pump::run_error_sink(
            error_rx,
            self.console.stderr(),
            self.console.stdout(),
            self.renderer,
            cancel.clone(),
        ));
        let reader = tokio::spawn(pump::run_inbound(
            source,
            self.config.buffer_size,
            inbound_tx,
            error_tx.clone(),
            cancel.clone(),
        ));
        let presenter = tokio::spawn(pump::run_presenter(
            inbound_rx,
            self.console.stdout(),
            self.renderer,
        ));

        tokio::pin!(interrupt);
        let mut interrupted = false;
        let mut exhausted = false;

        let mut sink = match self.config.render_mode {
            RenderMode::Raw => {
                drop(error_tx);
                Some(sink)
            }
            RenderMode::Interactive => {
                let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
                let writer = tokio::spawn(pump::run_outbound(
                    sink,
                    outbound_rx,
                    error_tx,
                    cancel.clone(),
                ));

                tokio::select! {
                    end = pump::run_input(input, self.console.stdout(), outbound_tx, &cancel) => {
                        tracing::debug!(?end, "operator input finished");
                        exhausted = end == pump::InputEnd::Exhausted;
                    }
                    () = &mut interrupt => interrupted = true,
                }
                if !exhausted {
                    cancel.cancel();
                }
                // The queue sender is gone, so the writer drains what is left
                // and hands the write half back.
                join("outbound writer", writer).await
            }
        };

        if exhausted {
            // Close first and keep reading: replies still in flight are
            // rendered until the remote acknowledges the close.
            match sink.take() {
                Some(sink) => transport::close(sink).await,
                None => cancel.cancel(),
            }
        }

        if !cancel.is_cancelled() {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = &mut interrupt => interrupted = true,
            }
        }
        cancel.cancel();
        if let Some(sink) = sink {
            transport::close(sink).await;
        }

        join("inbound reader", reader).await;
        match join("presenter", presenter).await {
            Some(Err(err)) => tracing::warn!(error = %err, "failed to render inbound message"),
            Some(Ok(_)) | None => {}
        }
        let remote = join("error sink", error_sink).await.flatten();

        let outcome = match remote {
            Some(reason) if !exhausted => SessionOutcome::RemoteClosed(reason),
            _ if interrupted => SessionOutcome::Interrupted,
            _ => SessionOutcome::InputExhausted,
        };
        tracing::debug!(?outcome, "session finished");
        outcome
    }
}

async fn write_banner<W: AsyncWrite + Unpin>(out: &mut W, banner: &str) -> Result<(), ClientError> {
    out.write_all(banner.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Awaits a pump task, logging instead of propagating a panic.
async fn join<T>(task: &'static str, handle: JoinHandle<T>) -> Option<T> {
    match handle.await {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(task, error = %err, "task failed");
            None
        }
    }
}
