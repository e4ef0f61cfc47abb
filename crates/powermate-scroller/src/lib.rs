//! powermate-scroller library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does powermate-scroller do? (for beginners)
//!
//! The Griffin PowerMate is a USB knob.  Linux exposes it as an evdev node
//! that reports "dial turned by N" and "button 0 pressed", which almost no
//! application understands.  The scroller:
//!
//! 1. Creates a virtual mouse through `/dev/uinput` that only has a scroll
//!    wheel and a left button.
//! 2. Opens the PowerMate's event node, retrying every few seconds while it
//!    is unplugged.
//! 3. Turns every dial step into wheel motion and every knob press into a
//!    left click, followed by a sync marker.
//! 4. Destroys the virtual mouse exactly once when the process exits.

/// Application layer: translation use case and the connection state machine.
pub mod application;

/// Infrastructure layer: uinput, evdev, and signal adapters.
pub mod infrastructure;
