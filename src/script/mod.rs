//! The built-in automaton: a line-driven state machine.
//!
//! A script names states; each state holds an ordered transition list.
//! A transition matches an output line literally or by regex, may move
//! the machine to another state, and may emit a command for the child.
//! First match wins; unmatched lines are ignored.

mod config;
mod machine;

pub use config::{ScriptConfig, ScriptError, StateConfig, TransitionConfig};
pub use machine::ScriptMachine;
