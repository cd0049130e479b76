//! Shared harness for session tests.

#![allow(dead_code, clippy::panic)]

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use axum::Router;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{self, WebSocket};
use axum::http::HeaderMap;
use axum::routing::get;
use futures_util::{Sink, Stream, stream};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};

use wsd::console::Console;

/// In-memory terminal stream.
#[derive(Debug, Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Waits until the captured text contains `needle`.
    pub async fn wait_for(&self, needle: &str) {
        let found = tokio::time::timeout(Duration::from_secs(5), async {
            while !self.text().contains(needle) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        if found.is_err() {
            panic!("timed out waiting for {needle:?}, got {:?}", self.text());
        }
    }
}

impl AsyncWrite for Capture {
    fn poll_write(
        self: Pin<&mut Self>,
        _: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Console whose stdout and stderr are captured.
#[derive(Debug, Clone, Default)]
pub struct CaptureConsole {
    pub out: Capture,
    pub err: Capture,
}

impl Console for CaptureConsole {
    type Out = Capture;
    type Err = Capture;

    fn stdout(&self) -> Capture {
        self.out.clone()
    }

    fn stderr(&self) -> Capture {
        self.err.clone()
    }
}

/// Write half that forwards frames to a channel and counts closes.
#[derive(Debug)]
pub struct ChannelSink {
    frames: mpsc::UnboundedSender<Message>,
    closes: Arc<AtomicUsize>,
}

impl Sink<Message> for ChannelSink {
    type Error = tungstenite::Error;

    fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), Self::Error> {
        self.frames
            .send(item)
            .map_err(|_| tungstenite::Error::AlreadyClosed)
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

/// Remote side of an in-memory connection.
#[derive(Debug)]
pub struct FakeRemote {
    /// Frames the client sent.
    pub sent: mpsc::UnboundedReceiver<Message>,
    /// Feeds frames (or errors) to the client's reader.
    pub inbound: mpsc::UnboundedSender<Result<Message, tungstenite::Error>>,
    closes: Arc<AtomicUsize>,
}

impl FakeRemote {
    pub fn push(&self, item: Result<Message, tungstenite::Error>) {
        if self.inbound.send(item).is_err() {
            panic!("client reader is gone");
        }
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Waits until the client has closed its write half.
    pub async fn wait_for_close(&self) {
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            while self.close_count() == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        if closed.is_err() {
            panic!("client never closed the connection");
        }
    }

    /// Next text frame the client sent.
    pub async fn next_text(&mut self) -> String {
        let next = tokio::time::timeout(Duration::from_secs(5), self.sent.recv()).await;
        match next {
            Ok(Some(Message::Text(text))) => text.as_str().to_owned(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

pub type FakeSource =
    Pin<Box<dyn Stream<Item = Result<Message, tungstenite::Error>> + Send + 'static>>;

/// Builds an in-memory connection: (client write half, client read half, remote).
pub fn fake_connection() -> (ChannelSink, FakeSource, FakeRemote) {
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let closes = Arc::new(AtomicUsize::new(0));

    let source = stream::unfold(inbound_rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });

    (
        ChannelSink {
            frames: sent_tx,
            closes: Arc::clone(&closes),
        },
        Box::pin(source),
        FakeRemote {
            sent: sent_rx,
            inbound: inbound_tx,
            closes,
        },
    )
}

/// How the in-process test server treats each connection.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Replies `world` to `hello` and echoes anything else.
    Reply,
    /// Sends the given binary payloads, then closes with code 1000 "bye".
    SendThenClose(Vec<Vec<u8>>),
    /// Reports handshake headers as text frames, then echoes.
    ReportHeaders,
}

/// Starts an axum WebSocket server on an ephemeral port.
///
/// Returns the `ws://` URL and a receiver of every text frame the server got.
pub async fn start_server(behavior: Behavior) -> (String, mpsc::UnboundedReceiver<String>) {
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();

    let app = Router::new().route(
        "/ws",
        get(move |ws: WebSocketUpgrade, headers: HeaderMap| {
            let behavior = behavior.clone();
            let seen = seen_tx.clone();
            async move {
                ws.protocols(["chat"])
                    .on_upgrade(move |socket| serve(socket, behavior, headers, seen))
            }
        }),
    );

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("ws://{addr}/ws"), seen_rx)
}

async fn serve(
    mut socket: WebSocket,
    behavior: Behavior,
    headers: HeaderMap,
    seen: mpsc::UnboundedSender<String>,
) {
    match behavior {
        Behavior::SendThenClose(payloads) => {
            for payload in payloads {
                if socket.send(ws::Message::binary(payload)).await.is_err() {
                    return;
                }
            }
            let frame = ws::CloseFrame {
                code: 1000,
                reason: ws::Utf8Bytes::from_static("bye"),
            };
            let _ = socket.send(ws::Message::Close(Some(frame))).await;
            return;
        }
        Behavior::ReportHeaders => {
            for name in ["origin", "user-agent", "sec-websocket-protocol"] {
                let value = headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                let report = format!("{name}={value}");
                if socket.send(ws::Message::text(report)).await.is_err() {
                    return;
                }
            }
        }
        Behavior::Reply => {}
    }

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            ws::Message::Text(text) => {
                let text = text.as_str().to_owned();
                let _ = seen.send(text.clone());
                let reply = if text == "hello" { "world".to_owned() } else { text };
                if socket.send(ws::Message::text(reply)).await.is_err() {
                    return;
                }
            }
            ws::Message::Close(_) => return,
            _ => {}
        }
    }
}
