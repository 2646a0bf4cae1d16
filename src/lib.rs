//! Process-supervision harness.
//!
//! Spawns one child process (behind plain pipes or a pseudo-terminal),
//! mirrors its output byte-for-byte to the invoking terminal, frames the
//! same bytes into trimmed lines on a bounded bus, feeds those lines to an
//! [`automaton::Automaton`], writes the automaton's commands (and the
//! human's raw keystrokes) back to the child's input, forwards OS signals,
//! and returns the child's true exit code.

pub mod automaton;
pub mod bus;
pub mod child;
pub mod error;
pub mod pipeline;
pub mod relay;
pub mod script;
pub mod supervisor;

pub use automaton::{Automaton, PassiveAutomaton, StateChange};
pub use child::LaunchMode;
pub use error::HarnessError;
pub use supervisor::{run, ChildSpec};
