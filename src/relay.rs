//! Forwards OS signals received by the harness to the child process.
//!
//! Two stages share the signal bus: a notifier that turns signal-hook's
//! iterator into bus sends, and a relay that delivers each number to the
//! child's pid. Registration happens before the child is spawned so a
//! registration failure is a setup error, never a half-running pipeline.

#[cfg(unix)]
use std::sync::mpsc::Receiver;
#[cfg(unix)]
use std::thread;

#[cfg(unix)]
use signal_hook::iterator::Signals;

#[cfg(unix)]
use crate::bus;

/// Signals forwarded to the child.
///
/// The platform-capability-checked subset of the classic process-control
/// set: KILL, STOP, ILL, FPE, and SEGV cannot be registered at all, and
/// SIGCHLD is the child's own exit notification, so none of those are
/// forwarded.
#[cfg(unix)]
pub fn forwardable_signals() -> Vec<i32> {
    use signal_hook::consts::signal::*;

    let mut signals = vec![
        SIGABRT, SIGALRM, SIGBUS, SIGCONT, SIGHUP, SIGINT, SIGIO, SIGPIPE, SIGPROF, SIGQUIT,
        SIGSYS, SIGTERM, SIGTRAP, SIGTSTP, SIGTTIN, SIGTTOU, SIGURG, SIGUSR1, SIGUSR2, SIGVTALRM,
        SIGWINCH, SIGXCPU, SIGXFSZ,
    ];
    #[cfg(target_os = "linux")]
    signals.extend([libc::SIGPWR, libc::SIGSTKFLT]);
    signals
}

/// The registered-but-not-yet-forwarding half of the relay.
///
/// Created before the child exists; [`SignalNotifier::forward_to`] wires
/// it to a pid once there is one.
pub struct SignalNotifier {
    #[cfg(unix)]
    signals: Signals,
}

/// Both running relay threads plus the handle that stops them.
pub struct SignalForwarder {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    notifier: thread::JoinHandle<()>,
    #[cfg(unix)]
    relay: thread::JoinHandle<()>,
}

impl SignalNotifier {
    pub fn register() -> std::io::Result<Option<Self>> {
        #[cfg(unix)]
        {
            let signals = Signals::new(forwardable_signals())?;
            return Ok(Some(Self { signals }));
        }

        #[cfg(not(unix))]
        Ok(None)
    }

    pub fn forward_to(self, pid: i32) -> SignalForwarder {
        #[cfg(unix)]
        {
            let (tx, rx) = bus::signal_bus();
            let mut signals = self.signals;
            let handle = signals.handle();
            let notifier = thread::spawn(move || {
                for signal in signals.forever() {
                    if tx.send(signal).is_err() {
                        return;
                    }
                }
            });
            let relay = thread::spawn(move || relay_signals(pid, rx));
            return SignalForwarder {
                handle,
                notifier,
                relay,
            };
        }

        #[cfg(not(unix))]
        {
            let _ = pid;
            SignalForwarder {}
        }
    }
}

impl SignalForwarder {
    /// Stops the notifier, which drops the bus sender, which lets the
    /// relay drain and exit. Join order follows that chain.
    pub fn stop(self) {
        #[cfg(unix)]
        {
            self.handle.close();
            let _ = self.notifier.join();
            let _ = self.relay.join();
        }
    }
}

#[cfg(unix)]
fn relay_signals(pid: i32, signals: Receiver<i32>) {
    for signal in signals {
        // SAFETY: pid refers to the child we spawned and signal comes
        // from the registered forwardable set.
        let rc = unsafe { libc::kill(pid, signal) };
        if rc != 0 {
            tracing::debug!(pid, signal, "child gone, stopping signal relay");
            return;
        }
    }
}
