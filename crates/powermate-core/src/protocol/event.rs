//! The fixed-layout input event record shared by evdev and uinput.
//!
//! # What is an input event? (for beginners)
//!
//! The Linux input subsystem describes everything a keyboard, mouse, or dial
//! does as a stream of small records.  Each record says *when* it happened,
//! *what kind* of thing happened (`type`), *which* control it was (`code`),
//! and *how much* (`value`).  For example, turning the PowerMate one notch
//! clockwise produces:
//!
//! ```text
//! time=…  type=EV_REL  code=REL_DIAL    value=1
//! time=…  type=EV_SYN  code=SYN_REPORT  value=0
//! ```
//!
//! The same record format is written back into `/dev/uinput` to inject
//! synthetic events, so one struct and one codec serve both directions.

use std::time::{SystemTime, UNIX_EPOCH};

/// Size in bytes of one encoded event record on 64-bit Linux.
///
/// `seconds (8) + microseconds (8) + type (2) + code (2) + value (4)`.
pub const EVENT_SIZE: usize = 24;

/// Timestamp carried by every input event (`struct timeval`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventTime {
    pub seconds: i64,
    pub microseconds: i64,
}

impl EventTime {
    /// Creates a timestamp from its two components.
    pub fn new(seconds: i64, microseconds: i64) -> Self {
        Self {
            seconds,
            microseconds,
        }
    }

    /// Returns the current wall-clock time.
    ///
    /// Synthetic events are stamped at emission, never copied from the
    /// physical event that caused them.  A clock before the epoch yields zero.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            seconds: since_epoch.as_secs() as i64,
            microseconds: i64::from(since_epoch.subsec_micros()),
        }
    }
}

/// One decoded input event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputEvent {
    pub time: EventTime,
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    /// Creates an event with an explicit timestamp.
    pub fn new(time: EventTime, event_type: u16, code: u16, value: i32) -> Self {
        Self {
            time,
            event_type,
            code,
            value,
        }
    }

    /// Creates an event stamped with [`EventTime::now`].
    pub fn now(event_type: u16, code: u16, value: i32) -> Self {
        Self::new(EventTime::now(), event_type, code, value)
    }

    /// Returns `true` when this event has the given type and code.
    pub fn is(&self, event_type: u16, code: u16) -> bool {
        self.event_type == event_type && self.code == code
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codes::{EV_REL, REL_DIAL, REL_WHEEL};

    #[test]
    fn test_event_size_matches_struct_input_event_on_64_bit() {
        assert_eq!(EVENT_SIZE, 8 + 8 + 2 + 2 + 4);
    }

    #[test]
    fn test_event_time_now_is_after_epoch() {
        // Arrange / Act
        let now = EventTime::now();

        // Assert
        assert!(now.seconds > 0);
        assert!((0..1_000_000).contains(&now.microseconds));
    }

    #[test]
    fn test_is_matches_type_and_code() {
        // Arrange
        let event = InputEvent::new(EventTime::default(), EV_REL, REL_DIAL, 1);

        // Assert
        assert!(event.is(EV_REL, REL_DIAL));
        assert!(!event.is(EV_REL, REL_WHEEL));
    }
}
