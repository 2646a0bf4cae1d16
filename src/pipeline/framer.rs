use std::io::{self, BufRead};
use std::sync::mpsc::SyncSender;

/// Frames a byte stream into trimmed, non-empty lines on the output bus.
///
/// Blocks when the bus is full; that backpressure reaches the child via
/// its own pipe buffer filling up. Returns cleanly at end-of-stream or
/// when the bus's receiver is gone. Any other read error means the line
/// sequence can no longer be trusted, and a desynced view would silently
/// corrupt the automaton's decisions, so the process aborts instead.
pub fn frame_lines<R: BufRead>(mut reader: R, lines: SyncSender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) if is_stream_end(&err) => return,
            Err(err) => {
                tracing::error!(error = %err, "child output stream desynced");
                std::process::abort();
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if lines.send(line.to_string()).is_err() {
            return;
        }
    }
}

/// A pty master read fails with EIO once the child side is gone; that is
/// this topology's end-of-stream, not a desync.
fn is_stream_end(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EIO)
}
