//! SIGINT/SIGTERM handling.
//!
//! # How shutdown reaches a blocked read (for beginners)
//!
//! The scroller is single-threaded and spends nearly all of its time inside a
//! blocking `read` on the dial.  The handlers installed here do two things:
//!
//! 1. They set a process-wide [`AtomicBool`], the only thing a signal handler
//!    may safely touch.
//! 2. They are installed *without* `SA_RESTART`, so the kernel aborts the
//!    blocked `read` with `EINTR` instead of silently resuming it.
//!
//! The connection loop treats `EINTR` as "check the flag and carry on", sees
//! the flag, and returns normally.  `main` then destroys the virtual device
//! on the ordinary return path.
//!
//! The reconnect backoff must also notice the flag, so [`InterruptiblePause`]
//! sleeps in short slices instead of one long `sleep`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::debug;

use crate::application::connection::Pause;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Granularity at which [`InterruptiblePause`] checks the flag.
pub const DEFAULT_PAUSE_SLICE: Duration = Duration::from_millis(100);

/// The flag set by the installed handlers.
pub fn shutdown_flag() -> &'static AtomicBool {
    &SHUTDOWN
}

extern "C" fn handle_signal(_signal: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Installs the shutdown handler for SIGINT and SIGTERM.
///
/// # Errors
///
/// Returns the errno from `sigaction` if either handler cannot be installed.
pub fn install_signal_handlers() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: `handle_signal` only performs an atomic store, which is
        // async-signal-safe.
        unsafe { sigaction(signal, &action) }?;
        debug!("installed {signal:?} handler");
    }
    Ok(())
}

/// A [`Pause`] that sleeps in slices and returns early once `shutdown` is set.
#[derive(Debug, Clone, Copy)]
pub struct InterruptiblePause<'a> {
    shutdown: &'a AtomicBool,
    slice: Duration,
}

impl<'a> InterruptiblePause<'a> {
    pub fn new(shutdown: &'a AtomicBool) -> Self {
        Self::with_slice(shutdown, DEFAULT_PAUSE_SLICE)
    }

    pub fn with_slice(shutdown: &'a AtomicBool, slice: Duration) -> Self {
        Self { shutdown, slice }
    }
}

impl Pause for InterruptiblePause<'_> {
    fn pause(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while !self.shutdown.load(Ordering::SeqCst) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            thread::sleep(remaining.min(self.slice));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::raise;

    #[test]
    fn test_pause_waits_full_duration_without_shutdown() {
        // Arrange
        let flag = AtomicBool::new(false);
        let mut pause = InterruptiblePause::with_slice(&flag, Duration::from_millis(5));

        // Act
        let start = Instant::now();
        pause.pause(Duration::from_millis(30));

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_pause_returns_immediately_when_shutdown_already_set() {
        let flag = AtomicBool::new(true);
        let mut pause = InterruptiblePause::new(&flag);

        let start = Instant::now();
        pause.pause(Duration::from_secs(30));

        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_pause_stops_when_flag_set_from_another_thread() {
        // Arrange
        static FLAG: AtomicBool = AtomicBool::new(false);
        let mut pause = InterruptiblePause::with_slice(&FLAG, Duration::from_millis(10));
        let setter = thread::spawn(|| {
            thread::sleep(Duration::from_millis(50));
            FLAG.store(true, Ordering::SeqCst);
        });

        // Act
        let start = Instant::now();
        pause.pause(Duration::from_secs(30));
        setter.join().unwrap();

        // Assert
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_sigterm_sets_shutdown_flag() {
        // Arrange
        install_signal_handlers().unwrap();

        // Act
        raise(Signal::SIGTERM).unwrap();

        // Assert
        assert!(shutdown_flag().load(Ordering::SeqCst));
    }
}
