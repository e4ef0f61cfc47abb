//! Application layer use cases for the scroller.
//!
//! - **`translate_events`** – Decodes raw dial records and writes the matching
//!   wheel/button events to an [`translate_events::EventSink`].
//!
//! - **`connection`** – The Disconnected ⇄ Connected state machine that keeps
//!   reopening the dial and drives `translate_events` while it is present.
//!
//! - **`device_error`** – Sorts dial I/O errors into transient and fatal kinds
//!   so the state machine never looks at raw errno values.

pub mod connection;
pub mod device_error;
pub mod translate_events;
