//! Command-line surface.

use std::num::NonZeroUsize;

use clap::Parser;

use crate::config::{ClientConfig, DEFAULT_ORIGIN, DEFAULT_URL, RenderMode, non_empty};

/// Interactive WebSocket client.
#[derive(Debug, Parser)]
#[command(name = "wsd")]
#[command(about = "Connect to a WebSocket endpoint and exchange messages from the terminal")]
#[command(version)]
pub struct Cli {
    /// Origin of the WebSocket client
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// WebSocket server address to connect to
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// WebSocket subprotocol
    #[arg(long, default_value = "")]
    pub protocol: String,

    /// User-Agent header
    #[arg(long = "userAgent", default_value = "")]
    pub user_agent: String,

    /// Skip TLS certificate verification
    #[arg(long = "insecureSkipVerify")]
    pub insecure_skip_verify: bool,

    /// Inbound messages buffer size
    #[arg(long = "bufSize", default_value = "1024")]
    pub buf_size: NonZeroUsize,

    /// Don't format the messages received and don't launch an interactive shell
    #[arg(long)]
    pub raw: bool,
}

impl Cli {
    /// Converts parsed flags into a [`ClientConfig`].
    ///
    /// `color` enables ANSI decoration, typically when stdout is a terminal.
    #[must_use]
    pub fn into_config(self, color: bool) -> ClientConfig {
        ClientConfig {
            url: self.url,
            origin: self.origin,
            subprotocol: non_empty(self.protocol),
            user_agent: non_empty(self.user_agent),
            insecure_skip_verify: self.insecure_skip_verify,
            buffer_size: self.buf_size,
            render_mode: if self.raw {
                RenderMode::Raw
            } else {
                RenderMode::Interactive
            },
            color,
        }
    }
}
