//! The dial connection state machine.
//!
//! ```text
//!              open ok                      removed / EIO
//! Disconnected ───────────▶ Connected ────────────────────▶ Disconnected
//!      │  ▲                    │                                 │
//!      │  └── backoff ◀────────┼──────── backoff ◀───────────────┘
//!      │ absent                │ fatal read / emit error
//!      └───────────────────────┴──────────▶ Err (process exits)
//! ```
//!
//! # Ownership
//!
//! The dial handle returned by [`DialOpener::open`] lives for exactly one
//! session.  It is dropped (closed) before the backoff starts and never
//! reused.  The virtual device is *not* owned here: [`ConnectionLoop::run`]
//! only borrows the sink, so the caller's scope decides when it is destroyed.
//!
//! # Shutdown
//!
//! The loop polls a shared `AtomicBool` before every open and every read.
//! A termination signal sets the flag and interrupts the blocking read with
//! `EINTR`; the loop then returns `Ok(())`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use powermate_core::{ScrollerConfig, EVENT_SIZE};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::application::device_error::{DeviceError, DeviceErrorKind};
use crate::application::translate_events::{
    EmitError, EventSink, TranslateEventsUseCase, TranslationStats,
};

/// An open connection to the physical dial.  Dropping it closes the handle.
pub trait DialDevice {
    /// Reads at most one event record into `buf`, blocking until data arrives.
    ///
    /// Returns the number of bytes read, which may be less than a full record.
    fn read_record(&mut self, buf: &mut [u8; EVENT_SIZE]) -> Result<usize, DeviceError>;

    /// Switches the dial's indicator LED off.
    fn reset_indicator(&mut self) -> Result<(), DeviceError>;
}

/// Opens the physical dial.
pub trait DialOpener {
    type Device: DialDevice;

    fn open(&mut self) -> Result<Self::Device, DeviceError>;
}

/// Blocking wait between connection attempts.
#[cfg_attr(test, mockall::automock)]
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

impl<P: Pause + ?Sized> Pause for &mut P {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration);
    }
}

/// Errors that end the connection loop.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("cannot open dial: {0}")]
    Open(#[source] DeviceError),
    #[error("reading dial failed: {0}")]
    Read(#[source] DeviceError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// How one connection attempt ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// The dial was not there; back off and retry.
    Absent,
    /// A session ended because the dial went away; back off and retry.
    Disconnected,
    /// A signal interrupted `open` without requesting shutdown; retry now.
    Interrupted,
    /// Shutdown was requested.
    Shutdown,
}

/// Counters kept across the lifetime of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    pub open_attempts: u64,
    pub sessions: u64,
    pub disconnects: u64,
    pub backoffs: u64,
}

/// Drives the Disconnected ⇄ Connected cycle and the per-session read loop.
pub struct ConnectionLoop<'a, O: DialOpener, P: Pause> {
    opener: O,
    pause: P,
    translator: TranslateEventsUseCase,
    reconnect_delay: Duration,
    shutdown: &'a AtomicBool,
    state: ConnectionState,
    stats: ConnectionStats,
}

impl<'a, O: DialOpener, P: Pause> ConnectionLoop<'a, O, P> {
    /// Creates a loop in the `Disconnected` state.
    pub fn new(config: &ScrollerConfig, opener: O, pause: P, shutdown: &'a AtomicBool) -> Self {
        Self {
            opener,
            pause,
            translator: TranslateEventsUseCase::new(config.scroll_multiplier),
            reconnect_delay: config.reconnect_delay,
            shutdown,
            state: ConnectionState::Disconnected,
            stats: ConnectionStats::default(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn stats(&self) -> ConnectionStats {
        self.stats
    }

    pub fn translation_stats(&self) -> TranslationStats {
        self.translator.stats()
    }

    /// Runs until shutdown is requested or a fatal error occurs.
    ///
    /// Absent and removed dials are retried forever after
    /// `reconnect_delay`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] for a fatal open or read error, or when the
    /// sink rejects an event.  The dial handle is already closed when this
    /// returns.
    pub fn run<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ConnectionError> {
        info!("waiting for dial");
        loop {
            if self.shutdown_requested() {
                info!("shutdown requested; leaving connection loop");
                return Ok(());
            }

            match self.run_once(sink)? {
                Cycle::Absent | Cycle::Disconnected => self.backoff(),
                Cycle::Interrupted => {}
                Cycle::Shutdown => {
                    info!("shutdown requested; leaving connection loop");
                    return Ok(());
                }
            }
        }
    }

    /// Performs one open attempt and, if it succeeds, one full session.
    ///
    /// Does not back off; [`run`](Self::run) does that between cycles.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_once<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<Cycle, ConnectionError> {
        self.stats.open_attempts += 1;

        let mut device = match self.opener.open() {
            Ok(device) => device,
            Err(e) => {
                return match e.kind() {
                    DeviceErrorKind::Interrupted => Ok(Cycle::Interrupted),
                    DeviceErrorKind::Fatal => {
                        error!("cannot open dial: {e}");
                        Err(ConnectionError::Open(e))
                    }
                    DeviceErrorKind::Absent | DeviceErrorKind::Removed => {
                        debug!("dial not present: {e}");
                        Ok(Cycle::Absent)
                    }
                };
            }
        };

        self.state = ConnectionState::Connected;
        self.stats.sessions += 1;
        info!("dial connected");

        if let Err(e) = device.reset_indicator() {
            debug!("indicator reset not supported; continuing: {e}");
        }

        let outcome = self.read_loop(&mut device, sink);

        drop(device);
        self.state = ConnectionState::Disconnected;
        outcome
    }

    fn read_loop<S: EventSink + ?Sized>(
        &mut self,
        device: &mut O::Device,
        sink: &mut S,
    ) -> Result<Cycle, ConnectionError> {
        let mut buf = [0u8; EVENT_SIZE];
        loop {
            if self.shutdown_requested() {
                return Ok(Cycle::Shutdown);
            }

            match device.read_record(&mut buf) {
                Ok(n) => {
                    self.translator.handle_record(&buf[..n], sink)?;
                }
                Err(e) => match e.kind() {
                    DeviceErrorKind::Interrupted => continue,
                    DeviceErrorKind::Removed | DeviceErrorKind::Absent => {
                        self.stats.disconnects += 1;
                        info!(
                            "dial disconnected ({e}); retrying in {:?}",
                            self.reconnect_delay
                        );
                        return Ok(Cycle::Disconnected);
                    }
                    DeviceErrorKind::Fatal => {
                        error!("reading dial failed: {e}");
                        return Err(ConnectionError::Read(e));
                    }
                },
            }
        }
    }

    fn backoff(&mut self) {
        self.stats.backoffs += 1;
        self.pause.pause(self.reconnect_delay);
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
