//! Scroller configuration.
//!
//! [`ScrollerConfig`] holds every fixed value the process needs: the scroll
//! multiplier, the device paths, the reconnect delay, and the identity of the
//! virtual device.  It is built once at startup with
//! [`ScrollerConfig::default`] and then only ever borrowed.
//!
//! # Why no config file? (for beginners)
//!
//! The scroller runs as a background service for one specific piece of
//! hardware.  Its settings are the device's own constants, so they live in
//! code.  Tests build custom values with struct-update syntax:
//!
//! ```rust
//! use powermate_core::ScrollerConfig;
//!
//! let cfg = ScrollerConfig { scroll_multiplier: 4, ..ScrollerConfig::default() };
//! assert!(cfg.validate().is_ok());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::protocol::codec::ProtocolError;
use crate::protocol::descriptor::{encode_descriptor, DeviceIdentity};

/// Stable udev path of the Griffin PowerMate's event interface.
pub const DEFAULT_DIAL_PATH: &str =
    "/dev/input/by-id/usb-Griffin_Technology__Inc._Griffin_PowerMate-event-if00";

/// The uinput control device.
pub const DEFAULT_UINPUT_PATH: &str = "/dev/uinput";

/// Wheel units emitted per dial step.  1 is slow, 2–4 feel natural, above 6 jumps.
pub const DEFAULT_SCROLL_MULTIPLIER: i32 = 2;

/// Wait between connection attempts, both when the dial is absent and after it is removed.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Error type for invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero multiplier would swallow every dial movement.
    #[error("scroll multiplier must be non-zero")]
    ZeroMultiplier,

    /// A zero delay would spin on an absent device.
    #[error("reconnect delay must be greater than zero")]
    ZeroReconnectDelay,

    /// The virtual device identity cannot be encoded.
    #[error("invalid device identity: {0}")]
    Identity(#[from] ProtocolError),
}

/// All fixed runtime values for the scroller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollerConfig {
    /// Factor applied to each dial step before it is emitted as wheel motion.
    pub scroll_multiplier: i32,
    /// Event device node of the physical dial.
    pub dial_path: PathBuf,
    /// uinput control node used to create the virtual device.
    pub uinput_path: PathBuf,
    /// Backoff between connection attempts.
    pub reconnect_delay: Duration,
    /// Name and IDs of the virtual device.
    pub identity: DeviceIdentity,
}

impl Default for ScrollerConfig {
    /// | Field             | Default                                  |
    /// |-------------------|------------------------------------------|
    /// | scroll_multiplier | `2`                                      |
    /// | dial_path         | PowerMate `/dev/input/by-id/...` node    |
    /// | uinput_path       | `/dev/uinput`                            |
    /// | reconnect_delay   | 3 seconds                                |
    /// | identity          | [`DeviceIdentity::default`]              |
    fn default() -> Self {
        Self {
            scroll_multiplier: DEFAULT_SCROLL_MULTIPLIER,
            dial_path: PathBuf::from(DEFAULT_DIAL_PATH),
            uinput_path: PathBuf::from(DEFAULT_UINPUT_PATH),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            identity: DeviceIdentity::default(),
        }
    }
}

impl ScrollerConfig {
    /// Checks that the configuration can drive a working scroller.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll_multiplier == 0 {
            return Err(ConfigError::ZeroMultiplier);
        }
        if self.reconnect_delay.is_zero() {
            return Err(ConfigError::ZeroReconnectDelay);
        }
        encode_descriptor(&self.identity)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
