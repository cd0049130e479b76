//! Client configuration.
//!
//! [`ClientConfig`] carries everything the session needs to dial and run.
//! It is built once at startup (usually from [`crate::cli::Cli`]) and never
//! mutated afterwards.

use std::num::NonZeroUsize;

/// Default `Origin` header sent during the handshake.
pub const DEFAULT_ORIGIN: &str = "http://localhost/";

/// Default endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:1337/ws";

/// Default inbound read buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// How inbound messages and errors are rendered.
///
/// Fixed at startup; decides which tasks the session spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Prompt-decorated output plus the operator input loop.
    #[default]
    Interactive,
    /// Byte-exact passthrough, no prompt and no input loop.
    Raw,
}

impl RenderMode {
    /// Returns `true` for [`RenderMode::Raw`].
    #[must_use]
    pub const fn is_raw(self) -> bool {
        matches!(self, Self::Raw)
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Target endpoint (`ws://` or `wss://`).
    pub url: String,

    /// Value of the `Origin` header.
    pub origin: String,

    /// Subprotocol to request. `None` omits the header.
    pub subprotocol: Option<String>,

    /// `User-Agent` override. `None` omits the header.
    pub user_agent: Option<String>,

    /// Disables TLS certificate and hostname verification.
    pub insecure_skip_verify: bool,

    /// Upper bound on the size of each inbound message.
    pub buffer_size: NonZeroUsize,

    /// Output decoration and interactivity.
    pub render_mode: RenderMode,

    /// Whether decorated output uses ANSI colors.
    pub color: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            subprotocol: None,
            user_agent: None,
            insecure_skip_verify: false,
            buffer_size: NonZeroUsize::new(DEFAULT_BUFFER_SIZE).unwrap_or(NonZeroUsize::MIN),
            render_mode: RenderMode::Interactive,
            color: false,
        }
    }
}

impl ClientConfig {
    /// Returns a config for `url` with every other field at its default.
    #[must_use]
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Maps an empty string to `None`.
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
