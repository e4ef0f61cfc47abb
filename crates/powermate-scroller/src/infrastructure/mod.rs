//! Infrastructure layer for the scroller.
//!
//! Contains the OS-facing adapters: uinput, the evdev dial node, and signal
//! handling.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `powermate_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.
//!
//! # Sub-modules
//!
//! - **`virtual_device`** – Registers, feeds, and destroys the synthetic
//!   wheel/button device through `/dev/uinput`.  A `RecordingControl` mock
//!   stands in for the kernel in tests.
//!
//! - **`dial`** – Opens and reads the PowerMate's evdev node.  A
//!   `ScriptedDialOpener` mock replays plug/unplug scenarios in tests.
//!
//! - **`shutdown`** – SIGINT/SIGTERM handling and the interruptible backoff.

pub mod dial;
pub mod shutdown;
pub mod virtual_device;
