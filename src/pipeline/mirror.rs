use std::io::{self, Read};
use std::sync::mpsc::SyncSender;

use crate::bus::InputFrame;

/// Copies the invoking terminal's stdin onto the input bus as raw frames.
///
/// Runs on a detached thread: a read blocked on the real stdin cannot be
/// interrupted portably, so this task (and the input writer it keeps
/// alive) outlives the supervisor and is reaped at process exit. That is
/// a bounded leak of two tasks per invocation.
pub fn mirror_stdin(frames: SyncSender<InputFrame>) {
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 1024];

    loop {
        let count = match stdin.read(&mut buffer) {
            Ok(0) => return,
            Ok(count) => count,
            Err(_) => return,
        };
        if frames.send(InputFrame::Raw(buffer[..count].to_vec())).is_err() {
            return;
        }
    }
}
