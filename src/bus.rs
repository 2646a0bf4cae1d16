//! Bounded buses connecting pipeline stages.
//!
//! Every stage boundary is a `sync_channel` with a fixed capacity. A full
//! bus blocks its producer, which for the output bus throttles how fast the
//! child's pipe buffer is drained and so throttles the child itself. This
//! is the harness's only flow-control mechanism.
//!
//! A bus "closes" when its last sender drops; sending to a bus whose
//! receiver is gone returns `Err` rather than faulting, so no shutdown
//! ordering can panic a producer.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use crate::automaton::StateChange;

pub const OUTPUT_BUFFER: usize = 200;
pub const INPUT_BUFFER: usize = 20;
pub const SIGNAL_BUFFER: usize = 20;
pub const STATE_CHANGE_BUFFER: usize = 20;

/// One frame on the input bus.
///
/// Automaton commands and the human's raw keystrokes share the child's
/// input sink, so both travel through the same bus to a single writer
/// task. That keeps each write atomic per frame instead of having two
/// writers race on one handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFrame {
    /// An automaton command; written as the line followed by `\n`.
    Command(String),
    /// Bytes mirrored from the invoking terminal's stdin; written verbatim.
    Raw(Vec<u8>),
}

/// Trimmed, non-empty child output lines, fed by one or two framers.
pub fn output_bus() -> (SyncSender<String>, Receiver<String>) {
    sync_channel(OUTPUT_BUFFER)
}

/// Frames destined for the child's input.
pub fn input_bus() -> (SyncSender<InputFrame>, Receiver<InputFrame>) {
    sync_channel(INPUT_BUFFER)
}

/// Raw signal numbers from the notifier to the relay.
pub fn signal_bus() -> (SyncSender<i32>, Receiver<i32>) {
    sync_channel(SIGNAL_BUFFER)
}

/// State-change events from the automaton to the bridge.
pub fn state_change_bus() -> (SyncSender<StateChange>, Receiver<StateChange>) {
    sync_channel(STATE_CHANGE_BUFFER)
}
