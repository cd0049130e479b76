//! Terminal output handles.
//!
//! Several tasks write to the terminal at once (presenter, error sink, input
//! loop). Each asks the [`Console`] for its own writer instead of sharing
//! one behind a lock.

use tokio::io::AsyncWrite;

/// Source of stdout and stderr writers.
pub trait Console: Send + Sync + 'static {
    /// Writer for rendered messages and prompts.
    type Out: AsyncWrite + Unpin + Send + 'static;
    /// Writer for errors and notices.
    type Err: AsyncWrite + Unpin + Send + 'static;

    /// Returns a new stdout handle.
    fn stdout(&self) -> Self::Out;

    /// Returns a new stderr handle.
    fn stderr(&self) -> Self::Err;
}

/// The process terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    type Out = tokio::io::Stdout;
    type Err = tokio::io::Stderr;

    fn stdout(&self) -> Self::Out {
        tokio::io::stdout()
    }

    fn stderr(&self) -> Self::Err {
        tokio::io::stderr()
    }
}
