use std::io::Write;
use std::sync::mpsc::Receiver;

use crate::bus::InputFrame;

/// Sole owner of the child's input sink.
///
/// Drains the input bus until it closes, writing each command as the line
/// plus `\n` and each raw chunk verbatim. A write failure means the
/// child's input has gone away, usually because the child exited before
/// every queued frame was flushed; that is expected, so the task just
/// stops.
pub fn write_input<W: Write>(mut sink: W, frames: Receiver<InputFrame>) {
    for frame in frames {
        let result = match &frame {
            InputFrame::Command(line) => sink
                .write_all(line.as_bytes())
                .and_then(|()| sink.write_all(b"\n"))
                .and_then(|()| sink.flush()),
            InputFrame::Raw(bytes) => sink.write_all(bytes).and_then(|()| sink.flush()),
        };
        if let Err(err) = result {
            tracing::debug!(error = %err, "child input sink gone, stopping writer");
            return;
        }
    }
}
