//! Direct launcher: three independent pipes.
//!
//! Stdout and stderr are each tee'd to the real terminal and framed onto
//! the shared output bus, so lines from both land interleaved by arrival
//! while each stream keeps its own internal order.

use std::io::{self, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc::{Receiver, SyncSender};
use std::thread;

use crate::bus::InputFrame;
use crate::child::status::{decode_exit_status, Termination};
use crate::error::HarnessError;
use crate::pipeline::{frame_lines, mirror_stdin, write_input, Tee};
use crate::relay::SignalNotifier;

pub fn run(
    mut command: Command,
    output: SyncSender<String>,
    input: Receiver<InputFrame>,
    raw_input: SyncSender<InputFrame>,
) -> Result<Termination, HarnessError> {
    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::piped());

    // Signal registration must precede the spawn: a failure here has to
    // leave no child behind.
    let notifier = SignalNotifier::register().map_err(HarnessError::Setup)?;

    let mut child = command.spawn().map_err(HarnessError::Spawn)?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| HarnessError::Setup(io::Error::other("child stdout pipe missing")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| HarnessError::Setup(io::Error::other("child stderr pipe missing")))?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| HarnessError::Setup(io::Error::other("child stdin pipe missing")))?;

    let stdout_framer = thread::spawn({
        let output = output.clone();
        move || frame_lines(BufReader::new(Tee::new(stdout, io::stdout())), output)
    });
    let stderr_framer =
        thread::spawn(move || frame_lines(BufReader::new(Tee::new(stderr, io::stderr())), output));
    let _input_writer = thread::spawn(move || write_input(stdin, input));
    // Detached by design: see mirror_stdin.
    thread::spawn(move || mirror_stdin(raw_input));

    let forwarder = notifier.map(|n| n.forward_to(child.id() as i32));

    let status = child.wait().map_err(HarnessError::Wait)?;

    // The child's death closed its pipe ends, so both framers hit
    // end-of-stream; joining them drops the last output senders.
    if let Some(forwarder) = forwarder {
        forwarder.stop();
    }
    let _ = stdout_framer.join();
    let _ = stderr_framer.join();

    Ok(decode_exit_status(status))
}
