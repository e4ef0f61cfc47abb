//! Linux input event type and code constants.
//!
//! Values are taken from `linux/input-event-codes.h` and `linux/input.h`.
//! Only the handful of codes this program reads or writes are listed.

// ── Event types ───────────────────────────────────────────────────────────────

/// Synchronization marker; separates batches of state changes.
pub const EV_SYN: u16 = 0x00;
/// Key and button state changes.
pub const EV_KEY: u16 = 0x01;
/// Relative axis motion (mouse movement, wheels, dials).
pub const EV_REL: u16 = 0x02;
/// Miscellaneous events; the PowerMate uses these to drive its LED.
pub const EV_MSC: u16 = 0x04;

// ── Codes ─────────────────────────────────────────────────────────────────────

/// `EV_SYN` code telling consumers to apply the preceding events atomically.
pub const SYN_REPORT: u16 = 0x00;

/// Dial rotation reported by the PowerMate.
pub const REL_DIAL: u16 = 0x07;
/// Vertical scroll wheel.
pub const REL_WHEEL: u16 = 0x08;

/// First generic button; the PowerMate reports its knob press with this.
pub const BTN_0: u16 = 0x100;
/// Left mouse button.
pub const BTN_LEFT: u16 = 0x110;

/// `EV_MSC` code controlling the LED pulse/brightness.
pub const MSC_PULSELED: u16 = 0x01;

// ── Bus types ─────────────────────────────────────────────────────────────────

/// USB bus identifier used in the virtual device's `input_id`.
pub const BUS_USB: u16 = 0x03;
