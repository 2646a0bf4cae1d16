use std::io;

use thiserror::Error;

/// Errors that cross the supervisor's public boundary.
///
/// Everything else (a writer whose sink went away, a relay whose child
/// already exited) is handled locally by the affected task ending itself.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Pipe allocation or other pre-spawn wiring failed.
    #[error("Failed to set up child I/O: {0}")]
    Setup(#[source] io::Error),

    /// Pseudo-terminal allocation or wiring failed.
    #[error("Failed to set up pseudo-terminal: {0}")]
    Pty(#[source] anyhow::Error),

    /// The child process could not be started.
    #[error("Failed to spawn child process: {0}")]
    Spawn(#[source] io::Error),

    /// The wait for the child failed for a reason other than the child
    /// exiting or dying to a signal. The exit code is meaningless here.
    #[error("Failed to wait for child process: {0}")]
    Wait(#[source] io::Error),
}
