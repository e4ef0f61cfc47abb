//! The synthetic scroll device.
//!
//! # Lifecycle (for beginners)
//!
//! Creating a uinput device is a fixed conversation with the kernel:
//!
//! ```text
//! open("/dev/uinput", O_WRONLY | O_NONBLOCK)
//! ioctl(UI_SET_EVBIT,  EV_REL)      // "I report relative axes"
//! ioctl(UI_SET_RELBIT, REL_WHEEL)   // "...specifically a wheel"
//! ioctl(UI_SET_EVBIT,  EV_KEY)      // "I report keys"
//! ioctl(UI_SET_KEYBIT, BTN_LEFT)    // "...specifically the left button"
//! write(uinput_user_dev)            // name, bus, vendor, product, version
//! ioctl(UI_DEV_CREATE)
//! ```
//!
//! After that, every `write` of an input event record is delivered to
//! applications as if it came from real hardware.  On the way out,
//! `ioctl(UI_DEV_DESTROY)` removes the device and `close` releases the fd.
//!
//! [`VirtualDevice`] performs the registration in [`VirtualDevice::create`]
//! and the teardown in `Drop`, so the device is destroyed exactly once on
//! every exit path.  The raw calls go through the [`UinputControl`] trait,
//! implemented by [`linux::LinuxUinput`] and by [`mock::RecordingControl`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use powermate_core::protocol::codes::{BTN_LEFT, EV_KEY, EV_REL, REL_WHEEL};
use powermate_core::{
    encode_descriptor, encode_event, DeviceIdentity, EventTime, ProtocolError, SyntheticEvent,
    EVENT_SIZE,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::translate_events::{EmitError, EventSink};

pub mod linux;
pub mod mock;

/// Raw operations on an open uinput control handle.
///
/// Each method maps to one system call.  Dropping the implementor closes
/// the handle.
pub trait UinputControl {
    fn set_ev_bit(&mut self, event_type: u16) -> io::Result<()>;
    fn set_rel_bit(&mut self, code: u16) -> io::Result<()>;
    fn set_key_bit(&mut self, code: u16) -> io::Result<()>;
    fn write_descriptor(&mut self, descriptor: &[u8]) -> io::Result<()>;
    fn create(&mut self) -> io::Result<()>;
    fn destroy(&mut self) -> io::Result<()>;
    fn write_event(&mut self, record: &[u8; EVENT_SIZE]) -> io::Result<()>;
}

/// One step of the registration sequence, in the order it is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    EnableRelative,
    EnableWheel,
    EnableKey,
    EnableLeftButton,
    Descriptor,
    Create,
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegistrationStep::EnableRelative => "UI_SET_EVBIT EV_REL",
            RegistrationStep::EnableWheel => "UI_SET_RELBIT REL_WHEEL",
            RegistrationStep::EnableKey => "UI_SET_EVBIT EV_KEY",
            RegistrationStep::EnableLeftButton => "UI_SET_KEYBIT BTN_LEFT",
            RegistrationStep::Descriptor => "write uinput_user_dev",
            RegistrationStep::Create => "UI_DEV_CREATE",
        })
    }
}

/// Errors creating or destroying the virtual device.  All are fatal.
#[derive(Debug, Error)]
pub enum VirtualDeviceError {
    /// The uinput node is missing or not writable.
    #[error("cannot open uinput control device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The kernel rejected one registration step.
    #[error("uinput rejected {step}: {source}")]
    Register {
        step: RegistrationStep,
        #[source]
        source: io::Error,
    },

    /// The identity cannot be encoded into a descriptor.
    #[error("invalid device identity: {0}")]
    Descriptor(#[from] ProtocolError),

    /// `UI_DEV_DESTROY` failed.
    #[error("uinput destroy failed: {0}")]
    Destroy(#[source] io::Error),
}

/// A registered uinput device.  Destroyed when dropped.
pub struct VirtualDevice<C: UinputControl> {
    control: Option<C>,
}

impl<C: UinputControl> VirtualDevice<C> {
    /// Registers a wheel + left-button device on `control`.
    ///
    /// If any step fails, `control` is dropped (closing the handle) and no
    /// device exists.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualDeviceError::Register`] naming the rejected step, or
    /// [`VirtualDeviceError::Descriptor`] for an unencodable identity.
    pub fn create(mut control: C, identity: &DeviceIdentity) -> Result<Self, VirtualDeviceError> {
        let descriptor = encode_descriptor(identity)?;

        register(&mut control, RegistrationStep::EnableRelative, |c| c.set_ev_bit(EV_REL))?;
        register(&mut control, RegistrationStep::EnableWheel, |c| c.set_rel_bit(REL_WHEEL))?;
        register(&mut control, RegistrationStep::EnableKey, |c| c.set_ev_bit(EV_KEY))?;
        register(&mut control, RegistrationStep::EnableLeftButton, |c| c.set_key_bit(BTN_LEFT))?;
        register(&mut control, RegistrationStep::Descriptor, |c| {
            c.write_descriptor(&descriptor)
        })?;
        register(&mut control, RegistrationStep::Create, |c| c.create())?;

        info!(
            "virtual device '{}' created ({:04x}:{:04x})",
            identity.name, identity.vendor, identity.product
        );
        Ok(Self {
            control: Some(control),
        })
    }

    /// Destroys the device now and reports the result.
    ///
    /// `Drop` will not destroy it a second time.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualDeviceError::Destroy`] if `UI_DEV_DESTROY` fails; the
    /// handle is closed regardless.
    pub fn destroy(mut self) -> Result<(), VirtualDeviceError> {
        match self.control.take() {
            Some(control) => teardown(control).map_err(VirtualDeviceError::Destroy),
            None => Ok(()),
        }
    }
}

impl<C: UinputControl> EventSink for VirtualDevice<C> {
    fn emit(&mut self, event: SyntheticEvent) -> Result<(), EmitError> {
        let control = self.control.as_mut().ok_or(EmitError::Closed)?;
        let record = encode_event(&event.at(EventTime::now()));
        control.write_event(&record)?;
        Ok(())
    }
}

impl<C: UinputControl> Drop for VirtualDevice<C> {
    fn drop(&mut self) {
        if let Some(control) = self.control.take() {
            if let Err(e) = teardown(control) {
                warn!("uinput destroy failed: {e}");
            }
        }
    }
}

fn register<C, F>(control: &mut C, step: RegistrationStep, call: F) -> Result<(), VirtualDeviceError>
where
    C: UinputControl,
    F: FnOnce(&mut C) -> io::Result<()>,
{
    call(control).map_err(|source| VirtualDeviceError::Register { step, source })
}

/// Issues `UI_DEV_DESTROY`, then closes the handle by dropping it.
fn teardown<C: UinputControl>(mut control: C) -> io::Result<()> {
    let result = control.destroy();
    drop(control);
    if result.is_ok() {
        info!("virtual device destroyed");
    }
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
