//! Top-level orchestration.
//!
//! Owns every bus, starts the automaton and the bridge, delegates to the
//! selected launcher, and joins what can be joined. The join order is the
//! whole shutdown protocol: the launcher joins its framers once `wait()`
//! returns, which drops the last output senders, which ends the
//! automaton's receive loop, which drops the state-change sender, which
//! ends the bridge. Only the stdin mirror and the input writer it keeps
//! alive stay behind, reaped at process exit.

use std::path::PathBuf;
use std::process::Command;
use std::sync::mpsc::{Receiver, SyncSender};
use std::thread;

use portable_pty::CommandBuilder;

use crate::automaton::{Automaton, StateChange};
use crate::bus::{self, InputFrame};
use crate::child::{direct, pty, LaunchMode};
use crate::error::HarnessError;

/// What to run and how.
#[derive(Debug, Clone)]
pub struct ChildSpec {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl ChildSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    fn pty_command(&self) -> CommandBuilder {
        let mut cmd = CommandBuilder::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(cwd) = &self.cwd {
            cmd.cwd(cwd.clone());
        }
        cmd
    }
}

/// Runs the child under the harness and returns its exit code.
///
/// `Ok(code)` for any child that ran and terminated, including non-zero
/// exits and signal deaths (`128 + signal`). `Err` only for setup
/// failures and wait anomalies, in which case no exit code exists.
pub fn run(
    spec: &ChildSpec,
    automaton: Box<dyn Automaton>,
    mode: LaunchMode,
) -> Result<i32, HarnessError> {
    tracing::debug!(program = %spec.program, ?mode, "starting child");

    let (output_tx, output_rx) = bus::output_bus();
    let (input_tx, input_rx) = bus::input_bus();
    let (state_tx, state_rx) = bus::state_change_bus();

    let bridge = thread::spawn({
        let input_tx = input_tx.clone();
        move || pass_state_changes(state_rx, input_tx)
    });
    let automaton_task = thread::spawn(move || automaton.run(output_rx, state_tx));

    let termination = match mode {
        LaunchMode::Direct => direct::run(spec.command(), output_tx, input_rx, input_tx)?,
        LaunchMode::Pty => pty::run(spec.pty_command(), output_tx, input_rx, input_tx)?,
    };

    // The launcher joined its framers, so the output bus is closed and
    // the automaton and bridge wind down on their own.
    let _ = automaton_task.join();
    let _ = bridge.join();

    let exit = termination.exit_code();
    tracing::debug!(?termination, exit, "child terminated");
    Ok(exit)
}

/// The automaton bridge: adapts state-change events into command frames
/// on the input bus.
fn pass_state_changes(events: Receiver<StateChange>, input: SyncSender<InputFrame>) {
    for event in events {
        if input.send(InputFrame::Command(event.command)).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_forwards_commands_in_order() {
        let (state_tx, state_rx) = bus::state_change_bus();
        let (input_tx, input_rx) = bus::input_bus();

        let bridge = thread::spawn(move || pass_state_changes(state_rx, input_tx));
        for command in ["one", "two", "three"] {
            state_tx
                .send(StateChange {
                    command: command.to_string(),
                })
                .unwrap();
        }
        drop(state_tx);
        bridge.join().unwrap();

        let frames: Vec<InputFrame> = input_rx.into_iter().collect();
        assert_eq!(
            frames,
            vec![
                InputFrame::Command("one".to_string()),
                InputFrame::Command("two".to_string()),
                InputFrame::Command("three".to_string()),
            ]
        );
    }

    #[test]
    fn bridge_ends_when_input_receiver_gone() {
        let (state_tx, state_rx) = bus::state_change_bus();
        let (input_tx, input_rx) = bus::input_bus();
        drop(input_rx);

        let bridge = thread::spawn(move || pass_state_changes(state_rx, input_tx));
        let _ = state_tx.send(StateChange {
            command: "lost".to_string(),
        });
        bridge.join().unwrap();
    }

    #[test]
    fn child_spec_builds_a_command() {
        let spec = ChildSpec::new("printf")
            .args(["%s", "hi"])
            .env("MARKER", "1");
        let cmd = spec.command();
        assert_eq!(cmd.get_program(), "printf");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["%s", "hi"]);
    }
}
