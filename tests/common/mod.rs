//! Shared test utilities.

#![allow(dead_code)]

use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::{Arc, Mutex};

use stagehand::{Automaton, StateChange};

/// Everything a [`Recorder`] saw on the output bus, in arrival order.
pub type Seen = Arc<Mutex<Vec<String>>>;

/// Test automaton: records every line and answers configured lines with
/// a command.
pub struct Recorder {
    seen: Seen,
    replies: Vec<(String, String)>,
}

impl Recorder {
    pub fn new() -> (Self, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                seen: Arc::clone(&seen),
                replies: Vec::new(),
            },
            seen,
        )
    }

    /// Answer `on` with `with` every time it appears.
    pub fn reply(mut self, on: &str, with: &str) -> Self {
        self.replies.push((on.to_string(), with.to_string()));
        self
    }
}

impl Automaton for Recorder {
    fn run(self: Box<Self>, lines: Receiver<String>, events: SyncSender<StateChange>) {
        for line in lines {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(line.clone());
            }
            for (on, with) in &self.replies {
                if &line == on {
                    let _ = events.send(StateChange {
                        command: with.clone(),
                    });
                }
            }
        }
    }
}

/// Lines from `seen` restricted to those starting with `prefix`.
pub fn with_prefix(seen: &Seen, prefix: &str) -> Vec<String> {
    seen.lock()
        .unwrap()
        .iter()
        .filter(|line| line.starts_with(prefix))
        .cloned()
        .collect()
}
