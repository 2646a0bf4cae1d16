//! Pty launcher: one pseudo-terminal, stdout and stderr merged.
//!
//! The master stream is tee'd once (terminal passthrough + framer) and
//! the master writer is the single input sink, shared by automaton
//! commands and mirrored keystrokes through the input bus. The pty is
//! also resized to follow the invoking terminal on SIGWINCH.

use std::io::{self, BufReader};
use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;

use portable_pty::{native_pty_system, CommandBuilder, MasterPty, PtySize};

use crate::bus::InputFrame;
use crate::child::status::{decode_pty_status, Termination};
use crate::error::HarnessError;
use crate::pipeline::{frame_lines, mirror_stdin, write_input, Tee};
use crate::relay::SignalNotifier;

#[cfg(unix)]
use signal_hook::consts::signal::SIGWINCH;
#[cfg(unix)]
use signal_hook::iterator::Signals;

pub fn run(
    command: CommandBuilder,
    output: SyncSender<String>,
    input: Receiver<InputFrame>,
    raw_input: SyncSender<InputFrame>,
) -> Result<Termination, HarnessError> {
    let pty_system = native_pty_system();
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let pair = pty_system
        .openpty(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(HarnessError::Pty)?;

    // All registration and master-side wiring happens before the spawn:
    // a setup failure must leave no child behind.
    let notifier = SignalNotifier::register().map_err(HarnessError::Setup)?;
    let reader = pair.master.try_clone_reader().map_err(HarnessError::Pty)?;
    let writer = pair.master.take_writer().map_err(HarnessError::Pty)?;
    let master = Arc::new(Mutex::new(pair.master));
    let resize_watcher = ResizeWatcher::start(Arc::clone(&master)).map_err(HarnessError::Setup)?;

    let mut child = match pair.slave.spawn_command(command) {
        Ok(child) => child,
        Err(err) => {
            if let Some(watcher) = resize_watcher {
                watcher.stop();
            }
            return Err(HarnessError::Pty(err));
        }
    };
    drop(pair.slave);

    let framer =
        thread::spawn(move || frame_lines(BufReader::new(Tee::new(reader, io::stdout())), output));
    let _input_writer = thread::spawn(move || write_input(writer, input));
    // Detached by design: see mirror_stdin.
    thread::spawn(move || mirror_stdin(raw_input));

    let forwarder = match child.process_id() {
        Some(pid) => notifier.map(|n| n.forward_to(pid as i32)),
        None => None,
    };

    let status = child.wait().map_err(HarnessError::Wait)?;

    if let Some(forwarder) = forwarder {
        forwarder.stop();
    }
    if let Some(watcher) = resize_watcher {
        watcher.stop();
    }
    // With the slave side gone the master read fails with EIO, which the
    // framer treats as end-of-stream.
    let _ = framer.join();
    drop(master);

    Ok(decode_pty_status(&status))
}

/// Follows the invoking terminal's size changes into the pty.
struct ResizeWatcher {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    thread: thread::JoinHandle<()>,
}

impl ResizeWatcher {
    fn start(master: Arc<Mutex<Box<dyn MasterPty + Send>>>) -> io::Result<Option<Self>> {
        #[cfg(unix)]
        {
            let mut signals = Signals::new([SIGWINCH])?;
            let handle = signals.handle();
            let thread = thread::spawn(move || {
                for _ in signals.forever() {
                    let (cols, rows) = match crossterm::terminal::size() {
                        Ok(size) => size,
                        Err(_) => continue,
                    };
                    if let Ok(master) = master.lock() {
                        let _ = master.resize(PtySize {
                            rows,
                            cols,
                            pixel_width: 0,
                            pixel_height: 0,
                        });
                    }
                }
            });
            return Ok(Some(Self { handle, thread }));
        }

        #[cfg(not(unix))]
        {
            let _ = master;
            Ok(None)
        }
    }

    fn stop(self) {
        #[cfg(unix)]
        {
            self.handle.close();
            let _ = self.thread.join();
        }
    }
}
