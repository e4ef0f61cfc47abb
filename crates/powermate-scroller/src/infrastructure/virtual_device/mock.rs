//! Mock uinput control handle for unit and integration testing.
//!
//! # Why a mock control?
//!
//! The real [`super::linux::LinuxUinput`] needs `/dev/uinput`, root (or the
//! `input` group), and creates a device that every application on the test
//! machine would see.  `RecordingControl` instead appends each call to a
//! shared log so tests can assert the exact ioctl/write sequence, including
//! how many times the device was destroyed and the handle closed.
//!
//! # Usage in tests
//!
//! ```ignore
//! let (control, log) = RecordingControl::new();
//! let device = VirtualDevice::create(control, &DeviceIdentity::default()).unwrap();
//! drop(device);
//! assert_eq!(log.count(ControlOp::Destroy), 1);
//! assert_eq!(log.closes(), 1);
//! ```
//!
//! # Failure injection
//!
//! [`RecordingControl::failing`] makes every call of one [`ControlOp`] return
//! an error, which lets tests reject any registration step, the event write,
//! or the destroy request.

use std::io;
use std::sync::{Arc, Mutex};

use powermate_core::{decode_event, InputEvent, EVENT_SIZE};

use super::UinputControl;

/// One recorded call on the control handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCall {
    SetEvBit(u16),
    SetRelBit(u16),
    SetKeyBit(u16),
    WriteDescriptor(Vec<u8>),
    Create,
    Destroy,
    WriteEvent(InputEvent),
    /// The handle was dropped.
    Close,
}

impl ControlCall {
    fn op(&self) -> ControlOp {
        match self {
            ControlCall::SetEvBit(_) => ControlOp::SetEvBit,
            ControlCall::SetRelBit(_) => ControlOp::SetRelBit,
            ControlCall::SetKeyBit(_) => ControlOp::SetKeyBit,
            ControlCall::WriteDescriptor(_) => ControlOp::WriteDescriptor,
            ControlCall::Create => ControlOp::Create,
            ControlCall::Destroy => ControlOp::Destroy,
            ControlCall::WriteEvent(_) => ControlOp::WriteEvent,
            ControlCall::Close => ControlOp::Close,
        }
    }
}

/// Call kinds, used for counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOp {
    SetEvBit,
    SetRelBit,
    SetKeyBit,
    WriteDescriptor,
    Create,
    Destroy,
    WriteEvent,
    Close,
}

/// Shared view of everything a [`RecordingControl`] was asked to do.
///
/// Stays readable after the control itself has been dropped.
#[derive(Debug, Clone, Default)]
pub struct ControlLog(Arc<Mutex<Vec<ControlCall>>>);

impl ControlLog {
    pub fn calls(&self) -> Vec<ControlCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, op: ControlOp) -> usize {
        self.0.lock().unwrap().iter().filter(|c| c.op() == op).count()
    }

    pub fn closes(&self) -> usize {
        self.count(ControlOp::Close)
    }

    /// Decoded event records written after creation, in order.
    pub fn events(&self) -> Vec<InputEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                ControlCall::WriteEvent(e) => Some(*e),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: ControlCall) {
        self.0.lock().unwrap().push(call);
    }
}

/// A control handle that records calls instead of talking to the kernel.
#[derive(Debug)]
pub struct RecordingControl {
    log: ControlLog,
    fail_on: Option<ControlOp>,
}

impl RecordingControl {
    /// Creates a control that accepts every call.
    pub fn new() -> (Self, ControlLog) {
        let log = ControlLog::default();
        (
            Self {
                log: log.clone(),
                fail_on: None,
            },
            log,
        )
    }

    /// Creates a control that rejects every call of kind `op`.
    pub fn failing(op: ControlOp) -> (Self, ControlLog) {
        let (mut control, log) = Self::new();
        control.fail_on = Some(op);
        (control, log)
    }

    fn record(&self, call: ControlCall) -> io::Result<()> {
        let op = call.op();
        self.log.push(call);
        if self.fail_on == Some(op) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "mock failure",
            ));
        }
        Ok(())
    }
}

impl UinputControl for RecordingControl {
    fn set_ev_bit(&mut self, event_type: u16) -> io::Result<()> {
        self.record(ControlCall::SetEvBit(event_type))
    }

    fn set_rel_bit(&mut self, code: u16) -> io::Result<()> {
        self.record(ControlCall::SetRelBit(code))
    }

    fn set_key_bit(&mut self, code: u16) -> io::Result<()> {
        self.record(ControlCall::SetKeyBit(code))
    }

    fn write_descriptor(&mut self, descriptor: &[u8]) -> io::Result<()> {
        self.record(ControlCall::WriteDescriptor(descriptor.to_vec()))
    }

    fn create(&mut self) -> io::Result<()> {
        self.record(ControlCall::Create)
    }

    fn destroy(&mut self) -> io::Result<()> {
        self.record(ControlCall::Destroy)
    }

    fn write_event(&mut self, record: &[u8; EVENT_SIZE]) -> io::Result<()> {
        let event = decode_event(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        self.record(ControlCall::WriteEvent(event))
    }
}

impl Drop for RecordingControl {
    fn drop(&mut self) {
        self.log.push(ControlCall::Close);
    }
}
