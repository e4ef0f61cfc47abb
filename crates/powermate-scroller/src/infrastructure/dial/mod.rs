//! The physical PowerMate dial.
//!
//! # How the dial is read (for beginners)
//!
//! The kernel's evdev driver exposes the knob as a character device under
//! `/dev/input`.  Each `read` returns one 24-byte event record; the call
//! blocks until the knob is turned or pressed.  The stable
//! `/dev/input/by-id/...` symlink disappears when the USB cable is pulled,
//! and a `read` on an already-open handle then fails with `ENODEV`.
//!
//! Writing an `EV_MSC / MSC_PULSELED` record back to the same node sets the
//! brightness of the ring LED.
//!
//! - [`linux`] – the real device node.
//! - [`mock`] – a scripted opener for plug/unplug tests.

pub mod linux;
pub mod mock;
