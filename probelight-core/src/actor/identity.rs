//! Device identity

use heapless::String;

/// Maximum length of a device name in characters
pub const MAX_NAME_LEN: usize = 10;

/// Copy the longest prefix of `name` that fits in [`MAX_NAME_LEN`] bytes
pub fn bounded_name(name: &str) -> String<MAX_NAME_LEN> {
    let mut stored = String::new();
    for c in name.chars() {
        if stored.push(c).is_err() {
            break;
        }
    }
    stored
}

/// Immutable name and bus address of one peripheral
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    name: String<MAX_NAME_LEN>,
    address: u8,
}

impl Identity {
    /// Create an identity, truncating `name` to [`MAX_NAME_LEN`] bytes
    ///
    /// Truncation never splits a UTF-8 character.
    pub fn new(name: &str, address: u8) -> Self {
        Self {
            name: bounded_name(name),
            address,
        }
    }

    /// Human-readable device name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Peripheral address (7-bit I2C address, or a channel number)
    pub fn address(&self) -> u8 {
        self.address
    }
}
