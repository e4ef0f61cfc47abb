//! Classified errors for the physical dial.
//!
//! # Why classify? (for beginners)
//!
//! An unplugged USB device shows up as an ordinary I/O error: `ENOENT` when
//! the node is gone before `open`, `ENODEV` when it vanishes under a blocked
//! `read`.  Those are expected and must lead to a quiet retry.  A permission
//! error, on the other hand, will never fix itself and must stop the process.
//!
//! [`DeviceError`] carries an explicit [`DeviceErrorKind`] decided once, at
//! the point where the `std::io::Error` is produced.  The connection state
//! machine only ever matches on the kind.

use std::fmt;
use std::io;

use thiserror::Error;

/// How the connection state machine should react to a dial error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceErrorKind {
    /// The device node does not exist (never plugged in, or just unplugged).
    Absent,
    /// The open device went away during a read.
    Removed,
    /// A signal interrupted the system call.
    Interrupted,
    /// Anything else; not recoverable.
    Fatal,
}

/// The dial operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOp {
    Open,
    Read,
    WriteIndicator,
}

impl fmt::Display for DeviceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceOp::Open => "open",
            DeviceOp::Read => "read",
            DeviceOp::WriteIndicator => "indicator write",
        })
    }
}

/// An I/O error on the dial, tagged with its classification.
#[derive(Debug, Error)]
#[error("dial {op} failed ({kind:?}): {source}")]
pub struct DeviceError {
    kind: DeviceErrorKind,
    op: DeviceOp,
    #[source]
    source: io::Error,
}

impl DeviceError {
    /// Wraps `source`, classifying it for `op`.
    pub fn from_io(op: DeviceOp, source: io::Error) -> Self {
        Self {
            kind: classify(op, &source),
            op,
            source,
        }
    }

    /// Builds an error of a chosen kind without touching a device.
    ///
    /// The wrapped `io::Error` carries a representative errno, so
    /// classifying it again yields the same kind.
    pub fn injected(op: DeviceOp, kind: DeviceErrorKind) -> Self {
        let errno = match kind {
            DeviceErrorKind::Absent => libc::ENOENT,
            DeviceErrorKind::Removed => libc::ENODEV,
            DeviceErrorKind::Interrupted => libc::EINTR,
            DeviceErrorKind::Fatal => libc::EACCES,
        };
        Self {
            kind,
            op,
            source: io::Error::from_raw_os_error(errno),
        }
    }

    pub fn kind(&self) -> DeviceErrorKind {
        self.kind
    }

    pub fn op(&self) -> DeviceOp {
        self.op
    }

    /// Returns `true` for errors that end in a reconnect rather than an exit.
    pub fn is_transient(&self) -> bool {
        self.kind != DeviceErrorKind::Fatal
    }
}

/// Sorts an `io::Error` from `op` into a [`DeviceErrorKind`].
///
/// | errno                          | open     | read / indicator write |
/// |--------------------------------|----------|------------------------|
/// | `EINTR`                        | Interrupted | Interrupted         |
/// | `EAGAIN`                       | Fatal    | Interrupted            |
/// | `ENOENT`, `ENODEV`, `ENXIO`    | Absent   | Removed                |
/// | `EIO`                          | Fatal    | Removed                |
/// | anything else                  | Fatal    | Fatal                  |
pub fn classify(op: DeviceOp, error: &io::Error) -> DeviceErrorKind {
    let Some(errno) = error.raw_os_error() else {
        return classify_kind(op, error.kind());
    };

    if errno == libc::EINTR {
        return DeviceErrorKind::Interrupted;
    }

    match op {
        DeviceOp::Open => match errno {
            libc::ENOENT | libc::ENODEV | libc::ENXIO => DeviceErrorKind::Absent,
            _ => DeviceErrorKind::Fatal,
        },
        DeviceOp::Read | DeviceOp::WriteIndicator => match errno {
            libc::ENOENT | libc::ENODEV | libc::ENXIO | libc::EIO => DeviceErrorKind::Removed,
            libc::EAGAIN => DeviceErrorKind::Interrupted,
            _ => DeviceErrorKind::Fatal,
        },
    }
}

/// Fallback for errors that carry no OS error code.
fn classify_kind(op: DeviceOp, kind: io::ErrorKind) -> DeviceErrorKind {
    match (op, kind) {
        (_, io::ErrorKind::Interrupted) => DeviceErrorKind::Interrupted,
        (DeviceOp::Open, io::ErrorKind::NotFound) => DeviceErrorKind::Absent,
        (_, io::ErrorKind::NotFound) => DeviceErrorKind::Removed,
        _ => DeviceErrorKind::Fatal,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
