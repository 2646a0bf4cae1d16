//! Child process launchers and termination decoding.

pub mod direct;
pub mod pty;
mod status;

pub use status::{decode_exit_status, decode_pty_status, Termination};

/// How the child's I/O is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Three independent pipes; stdout and stderr are framed separately
    /// onto the shared output bus.
    Direct,
    /// A pseudo-terminal; stdout and stderr arrive merged as one stream.
    Pty,
}
