//! # powermate-core
//!
//! Shared library for PowerMate-Scroller containing the input event record
//! codec, the virtual-device descriptor encoder, the process configuration,
//! and the rule that turns dial events into scroll-wheel events.
//!
//! This crate has zero dependencies on OS APIs.  Everything here can be
//! exercised with plain byte slices, which is what the tests do.
//!
//! # Architecture overview (for beginners)
//!
//! PowerMate-Scroller reads a rotary dial (the Griffin PowerMate) through the
//! Linux evdev interface and re-publishes it as an ordinary mouse wheel via
//! uinput.  Applications that know nothing about "dial" events still scroll.
//!
//! - **`protocol`** – How bytes look on the evdev/uinput boundary.  Every
//!   event is a fixed 24-byte `struct input_event`, and the virtual device is
//!   registered with a fixed 1116-byte `uinput_user_dev` descriptor.
//!
//! - **`domain`** – Pure logic: the immutable [`ScrollerConfig`] and the
//!   [`translate`] function that maps one physical event to at most one
//!   synthetic event.

pub mod domain;
pub mod protocol;

pub use domain::config::{ConfigError, ScrollerConfig};
pub use domain::translate::{indicator_reset, translate, SyntheticEvent};
pub use protocol::codec::{decode_event, encode_event, ProtocolError};
pub use protocol::descriptor::{encode_descriptor, DeviceIdentity};
pub use protocol::event::{EventTime, InputEvent, EVENT_SIZE};
