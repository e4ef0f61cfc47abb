//! Scripted dial for unit and integration testing.
//!
//! # Why a scripted dial?
//!
//! Reconnect behaviour depends on the order in which the device appears,
//! produces events, and vanishes.  Unplugging real hardware on cue is not an
//! option in CI, so [`ScriptedDialOpener`] replays a fixed list of
//! [`OpenStep`]s instead: each `open` consumes one step, and each device it
//! hands out replays its own list of [`ReadStep`]s.
//!
//! When the open script runs out, `open` fails with a fatal error, which
//! ends any `ConnectionLoop::run` under test.  When a device's read script
//! runs out, the next read reports the device as removed.
//!
//! A [`DialProbe`] obtained before the opener is moved into the loop keeps
//! counting opens, closes, and indicator resets.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use powermate_core::{encode_event, InputEvent, EVENT_SIZE};

use crate::application::connection::{DialDevice, DialOpener};
use crate::application::device_error::{DeviceError, DeviceErrorKind, DeviceOp};

/// What one `read_record` call returns.
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// A complete, well-formed record.
    Event(InputEvent),
    /// Raw bytes, truncated to one record.  Use for short reads.
    Bytes(Vec<u8>),
    /// A read failure of the given kind.
    Error(DeviceErrorKind),
}

/// What one `open` call returns.
#[derive(Debug, Clone)]
pub enum OpenStep {
    Error(DeviceErrorKind),
    Device {
        indicator_supported: bool,
        reads: Vec<ReadStep>,
    },
}

impl OpenStep {
    /// The node does not exist.
    pub fn absent() -> Self {
        OpenStep::Error(DeviceErrorKind::Absent)
    }

    /// A dial that accepts the indicator reset and replays `reads`.
    pub fn device(reads: impl IntoIterator<Item = ReadStep>) -> Self {
        OpenStep::Device {
            indicator_supported: true,
            reads: reads.into_iter().collect(),
        }
    }

    /// A dial that rejects the indicator reset and replays `reads`.
    pub fn device_without_indicator(reads: impl IntoIterator<Item = ReadStep>) -> Self {
        OpenStep::Device {
            indicator_supported: false,
            reads: reads.into_iter().collect(),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    opens: usize,
    closes: usize,
    indicator_resets: usize,
}

/// Shared counters for a [`ScriptedDialOpener`] and the devices it opened.
#[derive(Debug, Clone, Default)]
pub struct DialProbe(Arc<Mutex<Counters>>);

impl DialProbe {
    /// Number of devices handed out.
    pub fn opens(&self) -> usize {
        self.0.lock().unwrap().opens
    }

    /// Number of devices dropped.
    pub fn closes(&self) -> usize {
        self.0.lock().unwrap().closes
    }

    /// Number of accepted indicator resets.
    pub fn indicator_resets(&self) -> usize {
        self.0.lock().unwrap().indicator_resets
    }

    fn update(&self, f: impl FnOnce(&mut Counters)) {
        f(&mut self.0.lock().unwrap());
    }
}

/// A [`DialOpener`] that replays a fixed script.
#[derive(Debug)]
pub struct ScriptedDialOpener {
    steps: VecDeque<OpenStep>,
    probe: DialProbe,
}

impl ScriptedDialOpener {
    pub fn new(steps: impl IntoIterator<Item = OpenStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            probe: DialProbe::default(),
        }
    }

    pub fn probe(&self) -> DialProbe {
        self.probe.clone()
    }
}

impl DialOpener for ScriptedDialOpener {
    type Device = ScriptedDial;

    fn open(&mut self) -> Result<ScriptedDial, DeviceError> {
        match self.steps.pop_front() {
            None => Err(DeviceError::injected(DeviceOp::Open, DeviceErrorKind::Fatal)),
            Some(OpenStep::Error(kind)) => Err(DeviceError::injected(DeviceOp::Open, kind)),
            Some(OpenStep::Device {
                indicator_supported,
                reads,
            }) => {
                self.probe.update(|c| c.opens += 1);
                Ok(ScriptedDial {
                    reads: reads.into(),
                    indicator_supported,
                    probe: self.probe.clone(),
                })
            }
        }
    }
}

/// A dial handed out by [`ScriptedDialOpener`].
#[derive(Debug)]
pub struct ScriptedDial {
    reads: VecDeque<ReadStep>,
    indicator_supported: bool,
    probe: DialProbe,
}

impl DialDevice for ScriptedDial {
    fn read_record(&mut self, buf: &mut [u8; EVENT_SIZE]) -> Result<usize, DeviceError> {
        match self.reads.pop_front() {
            Some(ReadStep::Event(event)) => {
                *buf = encode_event(&event);
                Ok(EVENT_SIZE)
            }
            Some(ReadStep::Bytes(bytes)) => {
                let n = bytes.len().min(EVENT_SIZE);
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(ReadStep::Error(kind)) => Err(DeviceError::injected(DeviceOp::Read, kind)),
            None => Err(DeviceError::injected(
                DeviceOp::Read,
                DeviceErrorKind::Removed,
            )),
        }
    }

    fn reset_indicator(&mut self) -> Result<(), DeviceError> {
        if !self.indicator_supported {
            return Err(DeviceError::injected(
                DeviceOp::WriteIndicator,
                DeviceErrorKind::Fatal,
            ));
        }
        self.probe.update(|c| c.indicator_resets += 1);
        Ok(())
    }
}

impl Drop for ScriptedDial {
    fn drop(&mut self) {
        self.probe.update(|c| c.closes += 1);
    }
}
