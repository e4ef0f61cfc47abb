//! The dial-to-wheel translation rule.
//!
//! | Physical event                         | Synthetic event                          |
//! |----------------------------------------|------------------------------------------|
//! | `EV_REL` / `REL_DIAL`, value `v != 0`  | `EV_REL` / `REL_WHEEL`, value `-v * m`   |
//! | `EV_KEY` / `BTN_0`, value `b`          | `EV_KEY` / `BTN_LEFT`, value `b`         |
//! | anything else                          | nothing                                  |
//!
//! `m` is the scroll multiplier.  The dial's clockwise direction is negated
//! so that turning right scrolls down.  Button values are press states and
//! pass through unscaled.
//!
//! Every synthetic data event must be followed by exactly one
//! [`SyntheticEvent::sync_report`]; the caller owns that step because it
//! owns the sink.

use tracing::trace;

use crate::protocol::codes::{
    BTN_0, BTN_LEFT, EV_KEY, EV_MSC, EV_REL, EV_SYN, MSC_PULSELED, REL_DIAL, REL_WHEEL,
    SYN_REPORT,
};
use crate::protocol::event::{EventTime, InputEvent};

/// An event to inject into the virtual device, before it is timestamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl SyntheticEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// The `EV_SYN` / `SYN_REPORT` marker closing one atomic update.
    pub fn sync_report() -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0)
    }

    /// Attaches a timestamp, producing a record ready for encoding.
    pub fn at(self, time: EventTime) -> InputEvent {
        InputEvent::new(time, self.event_type, self.code, self.value)
    }
}

/// Maps one physical event to the synthetic event it produces, if any.
///
/// The wheel value saturates instead of overflowing for extreme inputs.
pub fn translate(event: &InputEvent, multiplier: i32) -> Option<SyntheticEvent> {
    if event.is(EV_REL, REL_DIAL) {
        if event.value == 0 {
            return None;
        }
        let wheel = event.value.saturating_neg().saturating_mul(multiplier);
        return Some(SyntheticEvent::new(EV_REL, REL_WHEEL, wheel));
    }

    if event.is(EV_KEY, BTN_0) {
        return Some(SyntheticEvent::new(EV_KEY, BTN_LEFT, event.value));
    }

    trace!(
        event_type = event.event_type,
        code = event.code,
        value = event.value,
        "ignoring event"
    );
    None
}

/// Builds the record that switches the dial's LED off.
///
/// Written to the physical device right after it is opened, as a visible
/// sign that the scroller has taken ownership.
pub fn indicator_reset() -> InputEvent {
    InputEvent::now(EV_MSC, MSC_PULSELED, 0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(event_type: u16, code: u16, value: i32) -> InputEvent {
        InputEvent::new(EventTime::new(10, 20), event_type, code, value)
    }

    // ── Dial ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_dial_value_3_with_multiplier_2_becomes_wheel_minus_6() {
        // Arrange
        let event = raw(EV_REL, REL_DIAL, 3);

        // Act
        let out = translate(&event, 2);

        // Assert
        assert_eq!(out, Some(SyntheticEvent::new(EV_REL, REL_WHEEL, -6)));
    }

    #[test]
    fn test_dial_negative_value_becomes_positive_wheel() {
        assert_eq!(
            translate(&raw(EV_REL, REL_DIAL, -1), 2),
            Some(SyntheticEvent::new(EV_REL, REL_WHEEL, 2))
        );
    }

    #[test]
    fn test_dial_wheel_value_is_negated_and_scaled_for_many_inputs() {
        for multiplier in [1, 2, 4, 7] {
            for value in (-50..=50).filter(|v| *v != 0) {
                let out = translate(&raw(EV_REL, REL_DIAL, value), multiplier).unwrap();
                assert_eq!(out.value, -value * multiplier, "v={value} m={multiplier}");
                assert_eq!((out.event_type, out.code), (EV_REL, REL_WHEEL));
            }
        }
    }

    #[test]
    fn test_dial_zero_value_produces_nothing() {
        assert_eq!(translate(&raw(EV_REL, REL_DIAL, 0), 2), None);
    }

    #[test]
    fn test_dial_extreme_value_saturates() {
        // Arrange
        let event = raw(EV_REL, REL_DIAL, i32::MIN);

        // Act
        let out = translate(&event, 2).unwrap();

        // Assert
        assert_eq!(out.value, i32::MAX);
    }

    // ── Button ────────────────────────────────────────────────────────────────

    #[test]
    fn test_button_press_becomes_left_button_press() {
        assert_eq!(
            translate(&raw(EV_KEY, BTN_0, 1), 2),
            Some(SyntheticEvent::new(EV_KEY, BTN_LEFT, 1))
        );
    }

    #[test]
    fn test_button_release_becomes_left_button_release() {
        assert_eq!(
            translate(&raw(EV_KEY, BTN_0, 0), 2),
            Some(SyntheticEvent::new(EV_KEY, BTN_LEFT, 0))
        );
    }

    #[test]
    fn test_button_value_is_not_scaled_by_multiplier() {
        let out = translate(&raw(EV_KEY, BTN_0, 1), 5).unwrap();
        assert_eq!(out.value, 1);
    }

    // ── Everything else ───────────────────────────────────────────────────────

    #[test]
    fn test_unrecognized_pairs_produce_nothing() {
        let ignored = [
            raw(EV_SYN, SYN_REPORT, 0),
            raw(EV_REL, REL_WHEEL, 1),
            raw(EV_KEY, BTN_LEFT, 1),
            raw(EV_MSC, MSC_PULSELED, 255),
            raw(EV_KEY, REL_DIAL, 1),
            raw(0x03, 0x00, 100),
        ];
        for event in ignored {
            assert_eq!(translate(&event, 2), None, "{event:?}");
        }
    }

    #[test]
    fn test_sync_report_is_ev_syn_syn_report_zero() {
        assert_eq!(
            SyntheticEvent::sync_report(),
            SyntheticEvent::new(EV_SYN, SYN_REPORT, 0)
        );
    }

    #[test]
    fn test_at_attaches_timestamp() {
        let event = SyntheticEvent::new(EV_REL, REL_WHEEL, -2).at(EventTime::new(5, 6));
        assert_eq!(event, InputEvent::new(EventTime::new(5, 6), EV_REL, REL_WHEEL, -2));
    }

    #[test]
    fn test_indicator_reset_sets_led_brightness_zero() {
        let event = indicator_reset();
        assert!(event.is(EV_MSC, MSC_PULSELED));
        assert_eq!(event.value, 0);
    }
}
