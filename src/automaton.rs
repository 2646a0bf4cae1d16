//! The external rule engine the harness runs the child for.
//!
//! The core treats the automaton as a black box spanning two buses: it
//! reads output lines until that bus closes and may emit state changes
//! carrying commands for the child. Its configuration and internal state
//! representation are its own business; see [`crate::script`] for the
//! built-in implementation.

use std::sync::mpsc::{Receiver, SyncSender};

/// Emitted by an automaton when it wants to drive the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Sent to the child's input verbatim, with one `\n` appended.
    pub command: String,
}

/// A producer/consumer across the output and state-change buses.
///
/// `run` owns the automaton for its whole lifetime and is expected to
/// return once `lines` closes. A dropped `events` receiver is not an
/// error; the automaton should simply stop emitting.
pub trait Automaton: Send {
    fn run(self: Box<Self>, lines: Receiver<String>, events: SyncSender<StateChange>);
}

/// Drains output lines and never emits a command.
///
/// Used when the harness runs without a script, so framers never block on
/// a bus nobody reads.
pub struct PassiveAutomaton;

impl Automaton for PassiveAutomaton {
    fn run(self: Box<Self>, lines: Receiver<String>, events: SyncSender<StateChange>) {
        drop(events);
        for _ in lines {}
    }
}
