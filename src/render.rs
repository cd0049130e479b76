//! Text produced for the terminal.
//!
//! Everything here is pure formatting; the tasks in [`crate::pump`] decide
//! where and when it is written. Keeping it pure makes the exact bytes easy
//! to test.

use std::fmt::Display;

use crossterm::style::{Color, Stylize};

use crate::config::RenderMode;
use crate::error::CloseReason;

/// Input prompt printed before each operator line.
pub const PROMPT: &str = "> ";

/// Formats banners, messages and errors for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    mode: RenderMode,
    color: bool,
}

impl Renderer {
    /// Creates a renderer. `color` only affects interactive mode output.
    #[must_use]
    pub const fn new(mode: RenderMode, color: bool) -> Self {
        Self { mode, color }
    }

    fn paint(&self, text: impl Display, color: Color) -> String {
        if self.color {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// `connecting to <url> [via <protocol>] from <origin>...`
    #[must_use]
    pub fn dialing(&self, url: &str, protocol: Option<&str>, origin: &str) -> String {
        let url = self.paint(url, Color::Yellow);
        let origin = self.paint(origin, Color::Yellow);
        match protocol {
            Some(protocol) => format!(
                "connecting to {url} via {} from {origin}...\n",
                self.paint(protocol, Color::Yellow)
            ),
            None => format!("connecting to {url} from {origin}...\n"),
        }
    }

    /// `successfully connected to <url>` followed by a blank line.
    #[must_use]
    pub fn connected(&self, url: &str) -> String {
        format!("successfully connected to {}\n\n", self.paint(url, Color::Green))
    }

    /// Bytes written to stdout for one inbound message.
    ///
    /// Raw mode returns the payload untouched. Interactive mode returns the
    /// payload as text behind a `< ` marker and redraws the prompt.
    #[must_use]
    pub fn received(&self, payload: &[u8]) -> Vec<u8> {
        match self.mode {
            RenderMode::Raw => payload.to_vec(),
            RenderMode::Interactive => {
                let text = String::from_utf8_lossy(payload);
                format!("\r< {}\n{PROMPT}", self.paint(text, Color::Cyan)).into_bytes()
            }
        }
    }

    /// Line written to stderr for a transient error.
    #[must_use]
    pub fn transient_error(&self, err: &impl Display) -> String {
        format!("\rerr {}\n", self.paint(err, Color::Red))
    }

    /// Line written to stderr when the remote closes the connection.
    #[must_use]
    pub fn closed_by_remote(&self, reason: &CloseReason) -> String {
        format!(
            "\r✝ {} - connection closed by remote\n",
            self.paint(reason, Color::Magenta)
        )
    }

    /// Prompt to redraw after asynchronous output, if any.
    #[must_use]
    pub const fn prompt(&self) -> Option<&'static str> {
        match self.mode {
            RenderMode::Raw => None,
            RenderMode::Interactive => Some(PROMPT),
        }
    }
}
