//! TranslateEventsUseCase: turns raw dial records into virtual wheel/button events.
//!
//! This use case sits at the application layer and delegates to an
//! [`EventSink`] for the actual injection.  The uinput implementation lives in
//! the infrastructure layer; tests plug in a recording sink.

use std::io;

use powermate_core::{decode_event, translate, InputEvent, SyntheticEvent};
use thiserror::Error;
use tracing::trace;

/// Error type for event injection.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write event to virtual device: {0}")]
    Io(#[from] io::Error),
    #[error("virtual device already destroyed")]
    Closed,
}

/// Destination for synthetic events.
///
/// Writes are unbuffered: each call reaches the device before returning.
pub trait EventSink {
    /// Injects one event, stamping it with the current time.
    fn emit(&mut self, event: SyntheticEvent) -> Result<(), EmitError>;
}

/// What happened to one raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// A data event and its sync marker were emitted.
    Emitted,
    /// The event is not a dial step or a knob press.
    Ignored,
    /// Fewer bytes than one record were read; nothing was decoded.
    ShortRead,
}

/// Running totals, for diagnostics only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TranslationStats {
    pub emitted: u64,
    pub ignored: u64,
    pub short_reads: u64,
}

/// The Translate Events use case.
pub struct TranslateEventsUseCase {
    multiplier: i32,
    stats: TranslationStats,
}

impl TranslateEventsUseCase {
    /// Creates a use case scaling dial steps by `multiplier`.
    pub fn new(multiplier: i32) -> Self {
        Self {
            multiplier,
            stats: TranslationStats::default(),
        }
    }

    /// Decodes one raw record and forwards its translation to `sink`.
    ///
    /// A short record is counted and discarded.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError`] if the sink rejects a write.
    pub fn handle_record<S: EventSink + ?Sized>(
        &mut self,
        bytes: &[u8],
        sink: &mut S,
    ) -> Result<Handled, EmitError> {
        match decode_event(bytes) {
            Ok(event) => self.handle_event(&event, sink),
            Err(e) => {
                trace!("discarding short read: {e}");
                self.stats.short_reads += 1;
                Ok(Handled::ShortRead)
            }
        }
    }

    /// Translates one decoded event.
    ///
    /// A recognised event produces exactly two writes: the data event, then
    /// `SYN_REPORT`.  Nothing is written for anything else.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError`] if the sink rejects a write.
    pub fn handle_event<S: EventSink + ?Sized>(
        &mut self,
        event: &InputEvent,
        sink: &mut S,
    ) -> Result<Handled, EmitError> {
        let Some(out) = translate(event, self.multiplier) else {
            self.stats.ignored += 1;
            return Ok(Handled::Ignored);
        };

        sink.emit(out)?;
        sink.emit(SyntheticEvent::sync_report())?;
        self.stats.emitted += 1;
        Ok(Handled::Emitted)
    }

    pub fn stats(&self) -> TranslationStats {
        self.stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use powermate_core::protocol::codes::{
        BTN_0, BTN_LEFT, EV_KEY, EV_MSC, EV_REL, EV_SYN, MSC_PULSELED, REL_DIAL, REL_WHEEL,
        SYN_REPORT,
    };
    use powermate_core::{encode_event, EventTime, EVENT_SIZE};

    // ── Recording sink ────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<(u16, u16, i32)>,
        should_fail: bool,
    }

    impl EventSink for RecordingSink {
        fn emit(&mut self, event: SyntheticEvent) -> Result<(), EmitError> {
            if self.should_fail {
                return Err(EmitError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "injected failure",
                )));
            }
            self.events.push((event.event_type, event.code, event.value));
            Ok(())
        }
    }

    fn record(event_type: u16, code: u16, value: i32) -> [u8; EVENT_SIZE] {
        encode_event(&InputEvent::new(EventTime::new(3, 4), event_type, code, value))
    }

    // ── Dial ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_dial_record_emits_wheel_then_sync() {
        // Arrange
        let mut uc = TranslateEventsUseCase::new(2);
        let mut sink = RecordingSink::default();

        // Act
        let handled = uc.handle_record(&record(EV_REL, REL_DIAL, 3), &mut sink).unwrap();

        // Assert
        assert_eq!(handled, Handled::Emitted);
        assert_eq!(
            sink.events,
            vec![(EV_REL, REL_WHEEL, -6), (EV_SYN, SYN_REPORT, 0)]
        );
    }

    #[test]
    fn test_each_dial_step_is_followed_by_exactly_one_sync() {
        // Arrange
        let mut uc = TranslateEventsUseCase::new(3);
        let mut sink = RecordingSink::default();

        // Act
        for value in [1, -2, 5] {
            uc.handle_record(&record(EV_REL, REL_DIAL, value), &mut sink).unwrap();
        }

        // Assert – strictly alternating data/sync, nothing interleaved
        assert_eq!(
            sink.events,
            vec![
                (EV_REL, REL_WHEEL, -3),
                (EV_SYN, SYN_REPORT, 0),
                (EV_REL, REL_WHEEL, 6),
                (EV_SYN, SYN_REPORT, 0),
                (EV_REL, REL_WHEEL, -15),
                (EV_SYN, SYN_REPORT, 0),
            ]
        );
    }

    #[test]
    fn test_zero_dial_value_emits_nothing() {
        let mut uc = TranslateEventsUseCase::new(2);
        let mut sink = RecordingSink::default();

        let handled = uc.handle_record(&record(EV_REL, REL_DIAL, 0), &mut sink).unwrap();

        assert_eq!(handled, Handled::Ignored);
        assert!(sink.events.is_empty());
    }

    // ── Button ────────────────────────────────────────────────────────────────

    #[test]
    fn test_button_press_and_release_pass_through_unscaled() {
        // Arrange
        let mut uc = TranslateEventsUseCase::new(4);
        let mut sink = RecordingSink::default();

        // Act
        uc.handle_record(&record(EV_KEY, BTN_0, 1), &mut sink).unwrap();
        uc.handle_record(&record(EV_KEY, BTN_0, 0), &mut sink).unwrap();

        // Assert
        assert_eq!(
            sink.events,
            vec![
                (EV_KEY, BTN_LEFT, 1),
                (EV_SYN, SYN_REPORT, 0),
                (EV_KEY, BTN_LEFT, 0),
                (EV_SYN, SYN_REPORT, 0),
            ]
        );
    }

    // ── Ignored / short ───────────────────────────────────────────────────────

    #[test]
    fn test_unrecognized_record_is_ignored() {
        let mut uc = TranslateEventsUseCase::new(2);
        let mut sink = RecordingSink::default();

        let handled = uc
            .handle_record(&record(EV_MSC, MSC_PULSELED, 7), &mut sink)
            .unwrap();

        assert_eq!(handled, Handled::Ignored);
        assert!(sink.events.is_empty());
        assert_eq!(uc.stats().ignored, 1);
    }

    #[test]
    fn test_short_record_is_discarded() {
        // Arrange
        let mut uc = TranslateEventsUseCase::new(2);
        let mut sink = RecordingSink::default();
        let full = record(EV_REL, REL_DIAL, 3);

        // Act
        let handled = uc.handle_record(&full[..10], &mut sink).unwrap();

        // Assert
        assert_eq!(handled, Handled::ShortRead);
        assert!(sink.events.is_empty());
        assert_eq!(uc.stats().short_reads, 1);
    }

    #[test]
    fn test_sink_failure_propagates() {
        // Arrange
        let mut uc = TranslateEventsUseCase::new(2);
        let mut sink = RecordingSink {
            should_fail: true,
            ..RecordingSink::default()
        };

        // Act
        let result = uc.handle_record(&record(EV_REL, REL_DIAL, 1), &mut sink);

        // Assert
        assert!(matches!(result, Err(EmitError::Io(_))));
        assert_eq!(uc.stats().emitted, 0);
    }

    #[test]
    fn test_stats_count_emitted_events() {
        let mut uc = TranslateEventsUseCase::new(2);
        let mut sink = RecordingSink::default();

        uc.handle_record(&record(EV_REL, REL_DIAL, 1), &mut sink).unwrap();
        uc.handle_record(&record(EV_KEY, BTN_0, 1), &mut sink).unwrap();

        assert_eq!(
            uc.stats(),
            TranslationStats {
                emitted: 2,
                ignored: 0,
                short_reads: 0
            }
        );
    }
}
