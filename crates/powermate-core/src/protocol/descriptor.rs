//! Encoder for the legacy `uinput_user_dev` device descriptor.
//!
//! Before issuing `UI_DEV_CREATE`, a uinput client writes one descriptor
//! record describing the device it wants the kernel to create:
//!
//! ```text
//! [name:80][bustype:2][vendor:2][product:2][version:2][ff_effects_max:4]
//! [absmax:64*4][absmin:64*4][absfuzz:64*4][absflat:64*4]
//! ```
//!
//! Total size: 1116 bytes, host byte order.  The four absolute-axis tables
//! are left zeroed because the scroller only declares relative axes.

use crate::protocol::codec::ProtocolError;
use crate::protocol::codes::BUS_USB;

/// Width of the NUL-padded name field (`UINPUT_MAX_NAME_SIZE`).
pub const NAME_FIELD_SIZE: usize = 80;

/// Number of absolute axes covered by each metadata table (`ABS_CNT`).
const ABS_CNT: usize = 64;

/// Total encoded descriptor size in bytes.
pub const DESCRIPTOR_SIZE: usize = NAME_FIELD_SIZE + 4 * 2 + 4 + 4 * ABS_CNT * 4;

/// Identity advertised by the virtual device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Human-readable name shown by `evtest`, `libinput list-devices`, etc.
    pub name: String,
    pub bus_type: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

impl Default for DeviceIdentity {
    /// `PowerMate-Scroller`, USB bus, Griffin vendor/product IDs, version 1.
    fn default() -> Self {
        Self {
            name: "PowerMate-Scroller".to_string(),
            bus_type: BUS_USB,
            vendor: 0x077d,
            product: 0x0410,
            version: 1,
        }
    }
}

/// Encodes `identity` into a [`DESCRIPTOR_SIZE`]-byte descriptor.
///
/// # Errors
///
/// Returns [`ProtocolError::NameTooLong`] if the name does not leave room
/// for the terminating NUL inside the 80-byte field.
pub fn encode_descriptor(identity: &DeviceIdentity) -> Result<Vec<u8>, ProtocolError> {
    let name = identity.name.as_bytes();
    let max = NAME_FIELD_SIZE - 1;
    if name.len() > max {
        return Err(ProtocolError::NameTooLong {
            len: name.len(),
            max,
        });
    }

    let mut buf = Vec::with_capacity(DESCRIPTOR_SIZE);
    buf.extend_from_slice(name);
    buf.resize(NAME_FIELD_SIZE, 0);

    buf.extend_from_slice(&identity.bus_type.to_ne_bytes());
    buf.extend_from_slice(&identity.vendor.to_ne_bytes());
    buf.extend_from_slice(&identity.product.to_ne_bytes());
    buf.extend_from_slice(&identity.version.to_ne_bytes());
    buf.extend_from_slice(&0u32.to_ne_bytes()); // ff_effects_max

    buf.resize(DESCRIPTOR_SIZE, 0); // absmax, absmin, absfuzz, absflat
    Ok(buf)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_size_is_1116_bytes() {
        assert_eq!(DESCRIPTOR_SIZE, 1116);
    }

    #[test]
    fn test_encode_default_identity_layout() {
        // Arrange
        let identity = DeviceIdentity::default();

        // Act
        let bytes = encode_descriptor(&identity).unwrap();

        // Assert
        assert_eq!(bytes.len(), DESCRIPTOR_SIZE);
        assert_eq!(&bytes[..18], b"PowerMate-Scroller");
        assert!(bytes[18..80].iter().all(|&b| b == 0), "name must be NUL padded");
        assert_eq!(&bytes[80..82], &BUS_USB.to_ne_bytes());
        assert_eq!(&bytes[82..84], &0x077du16.to_ne_bytes());
        assert_eq!(&bytes[84..86], &0x0410u16.to_ne_bytes());
        assert_eq!(&bytes[86..88], &1u16.to_ne_bytes());
        assert!(bytes[88..].iter().all(|&b| b == 0), "abs tables must be zeroed");
    }

    #[test]
    fn test_encode_accepts_name_of_79_bytes() {
        let identity = DeviceIdentity {
            name: "x".repeat(79),
            ..DeviceIdentity::default()
        };
        let bytes = encode_descriptor(&identity).unwrap();
        assert_eq!(bytes[79], 0, "last name byte must stay NUL");
    }

    #[test]
    fn test_encode_rejects_name_of_80_bytes() {
        // Arrange
        let identity = DeviceIdentity {
            name: "x".repeat(80),
            ..DeviceIdentity::default()
        };

        // Act
        let result = encode_descriptor(&identity);

        // Assert
        assert_eq!(result, Err(ProtocolError::NameTooLong { len: 80, max: 79 }));
    }
}
