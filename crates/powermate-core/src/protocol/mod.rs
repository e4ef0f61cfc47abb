//! Protocol module containing event codes, the event record, and the binary codecs.

pub mod codec;
pub mod codes;
pub mod descriptor;
pub mod event;

pub use codec::{decode_event, encode_event, ProtocolError};
pub use descriptor::{encode_descriptor, DeviceIdentity, DESCRIPTOR_SIZE};
pub use event::{EventTime, InputEvent, EVENT_SIZE};
