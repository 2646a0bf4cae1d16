use std::process::ExitStatus;

/// How the child left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Exited(i32),
    Signaled(i32),
}

impl Termination {
    /// The numeric code reported to the caller, using the shell
    /// convention of `128 + signal` for signal deaths.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Exited(code) => code,
            Termination::Signaled(signal) => 128 + signal,
        }
    }
}

/// Decodes a direct-mode wait status.
pub fn decode_exit_status(status: ExitStatus) -> Termination {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Termination::Signaled(signal);
        }
    }
    Termination::Exited(status.code().unwrap_or(1))
}

/// Decodes a pty-mode wait status.
///
/// portable-pty reports a signal death with its exit code collapsed to 1
/// and the signal surviving only as `strsignal(3)` text (or "Signal {n}"
/// where no description exists), so the number is recovered from that
/// text.
pub fn decode_pty_status(status: &portable_pty::ExitStatus) -> Termination {
    #[cfg(unix)]
    {
        if let Some(name) = status.signal() {
            if let Some(signal) = signal_number(name) {
                return Termination::Signaled(signal);
            }
        }
    }
    Termination::Exited(status.exit_code() as i32)
}

/// Inverts portable-pty's signal naming by round-tripping candidate
/// numbers through the same `strsignal(3)` it encoded with.
#[cfg(unix)]
fn signal_number(name: &str) -> Option<i32> {
    if let Some(number) = name.strip_prefix("Signal ").and_then(|n| n.parse().ok()) {
        return Some(number);
    }
    (1..32).find(|&signal| {
        let described = unsafe { libc::strsignal(signal) };
        if described.is_null() {
            return false;
        }
        let described = unsafe { std::ffi::CStr::from_ptr(described) };
        described.to_string_lossy() == name
    })
}
