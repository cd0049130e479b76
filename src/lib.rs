//! # wsd
//!
//! Interactive command-line WebSocket client.
//!
//! Opens one WebSocket connection, then concurrently forwards lines typed on
//! stdin as text frames and renders inbound frames on stdout. Transient I/O
//! errors are reported and the session keeps running; a remote close ends it
//! cleanly.
//!
//! ## Architecture
//!
//! ```text
//! main.rs (CLI, logging, exit code)
//!     │
//!     ├── Session (session.rs)
//!     │       dial ──► transport/
//!     │       spawn ─► pump/ (reader, presenter, error sink, writer)
//!     │       run ───► pump/input (on the session's own task)
//!     │
//!     ├── Renderer (render.rs)
//!     └── Console (console.rs)
//! ```

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod pump;
pub mod render;
pub mod session;
pub mod transport;
