//! Binary codec for encoding and decoding input event records.
//!
//! Wire format (`struct input_event` on 64-bit Linux):
//! ```text
//! [seconds:8][microseconds:8][type:2][code:2][value:4]
//! ```
//! Total record size: 24 bytes.  All integers are in host byte order because
//! the kernel reads and writes the struct directly from memory.  `seconds`,
//! `microseconds`, and `value` are signed; `type` and `code` are unsigned.

use thiserror::Error;

use crate::protocol::event::{EventTime, InputEvent, EVENT_SIZE};

/// Errors that can occur while encoding or decoding protocol structures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The byte slice is shorter than one full record.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The device name does not fit into the fixed-width descriptor field.
    #[error("device name is {len} bytes; at most {max} bytes fit")]
    NameTooLong { len: usize, max: usize },
}

// ── Field offsets ─────────────────────────────────────────────────────────────

const SECONDS: usize = 0;
const MICROSECONDS: usize = 8;
const TYPE: usize = 16;
const CODE: usize = 18;
const VALUE: usize = 20;

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`InputEvent`] into its fixed 24-byte record.
///
/// # Examples
///
/// ```rust
/// use powermate_core::protocol::{decode_event, encode_event, EventTime, InputEvent};
///
/// let event = InputEvent::new(EventTime::new(1, 2), 0x02, 0x08, -6);
/// let bytes = encode_event(&event);
/// assert_eq!(decode_event(&bytes).unwrap(), event);
/// ```
pub fn encode_event(event: &InputEvent) -> [u8; EVENT_SIZE] {
    let mut buf = [0u8; EVENT_SIZE];
    buf[SECONDS..MICROSECONDS].copy_from_slice(&event.time.seconds.to_ne_bytes());
    buf[MICROSECONDS..TYPE].copy_from_slice(&event.time.microseconds.to_ne_bytes());
    buf[TYPE..CODE].copy_from_slice(&event.event_type.to_ne_bytes());
    buf[CODE..VALUE].copy_from_slice(&event.code.to_ne_bytes());
    buf[VALUE..EVENT_SIZE].copy_from_slice(&event.value.to_ne_bytes());
    buf
}

/// Decodes one [`InputEvent`] from the beginning of `bytes`.
///
/// Bytes past the first record are ignored.
///
/// # Errors
///
/// Returns [`ProtocolError::InsufficientData`] if fewer than
/// [`EVENT_SIZE`] bytes are available (a short read).
pub fn decode_event(bytes: &[u8]) -> Result<InputEvent, ProtocolError> {
    if bytes.len() < EVENT_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: EVENT_SIZE,
            available: bytes.len(),
        });
    }

    let seconds = i64::from_ne_bytes(field(bytes, SECONDS));
    let microseconds = i64::from_ne_bytes(field(bytes, MICROSECONDS));
    let event_type = u16::from_ne_bytes(field(bytes, TYPE));
    let code = u16::from_ne_bytes(field(bytes, CODE));
    let value = i32::from_ne_bytes(field(bytes, VALUE));

    Ok(InputEvent::new(
        EventTime::new(seconds, microseconds),
        event_type,
        code,
        value,
    ))
}

/// Copies `N` bytes starting at `offset` into a fixed-size array.
///
/// Callers have already checked that the slice holds a full record.
fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codes::{BTN_LEFT, EV_KEY, EV_REL, REL_WHEEL};

    #[test]
    fn test_encode_places_fields_at_fixed_offsets() {
        // Arrange
        let event = InputEvent::new(EventTime::new(7, 250_000), EV_REL, REL_WHEEL, -6);

        // Act
        let bytes = encode_event(&event);

        // Assert
        assert_eq!(&bytes[0..8], &7i64.to_ne_bytes());
        assert_eq!(&bytes[8..16], &250_000i64.to_ne_bytes());
        assert_eq!(&bytes[16..18], &EV_REL.to_ne_bytes());
        assert_eq!(&bytes[18..20], &REL_WHEEL.to_ne_bytes());
        assert_eq!(&bytes[20..24], &(-6i32).to_ne_bytes());
    }

    #[test]
    fn test_decode_reads_hand_built_record() {
        // Arrange – build the bytes by hand rather than through encode_event
        let mut bytes = Vec::with_capacity(EVENT_SIZE);
        bytes.extend_from_slice(&1_700_000_000i64.to_ne_bytes());
        bytes.extend_from_slice(&42i64.to_ne_bytes());
        bytes.extend_from_slice(&EV_KEY.to_ne_bytes());
        bytes.extend_from_slice(&BTN_LEFT.to_ne_bytes());
        bytes.extend_from_slice(&1i32.to_ne_bytes());

        // Act
        let event = decode_event(&bytes).unwrap();

        // Assert
        assert_eq!(event.time, EventTime::new(1_700_000_000, 42));
        assert_eq!(event.event_type, EV_KEY);
        assert_eq!(event.code, BTN_LEFT);
        assert_eq!(event.value, 1);
    }

    #[test]
    fn test_decode_preserves_negative_value_sign() {
        let event = InputEvent::new(EventTime::default(), EV_REL, REL_WHEEL, i32::MIN);
        assert_eq!(decode_event(&encode_event(&event)).unwrap().value, i32::MIN);
    }

    #[test]
    fn test_decode_short_read_returns_insufficient_data() {
        // Arrange
        let bytes = [0u8; EVENT_SIZE - 1];

        // Act
        let result = decode_event(&bytes);

        // Assert
        assert_eq!(
            result,
            Err(ProtocolError::InsufficientData {
                needed: EVENT_SIZE,
                available: EVENT_SIZE - 1,
            })
        );
    }

    #[test]
    fn test_decode_empty_slice_returns_insufficient_data() {
        assert!(matches!(
            decode_event(&[]),
            Err(ProtocolError::InsufficientData { available: 0, .. })
        ));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        // Arrange
        let event = InputEvent::new(EventTime::new(1, 1), EV_REL, REL_WHEEL, 3);
        let mut bytes = encode_event(&event).to_vec();
        bytes.extend_from_slice(&[0xFF; 10]);

        // Act / Assert
        assert_eq!(decode_event(&bytes).unwrap(), event);
    }
}
