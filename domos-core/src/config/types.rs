//! Module configuration
//!
//! Written once when the module is provisioned and re-read at every boot.
//! After that only the peripheral count changes.

use domos_protocol::{max_address, MAX_ADDRESS_PINS};

/// Current persisted format version
pub const FILE_VERSION: u8 = 0;

/// Marker for an unused address pin slot
pub const UNUSED_PIN: u8 = 0xFF;

/// Default output line (PWM capable)
pub const DEFAULT_OUTPUT_PIN: u8 = 6;

/// Where peripheral records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageSelector {
    /// The byte store that also holds the configuration
    ByteStore,
    /// External card on the given chip-select line
    ///
    /// Not implemented: every registry write fails while it is selected.
    SdCard { chip_select: u8 },
}

impl StorageSelector {
    /// Persisted byte for the byte store
    pub const BYTE_STORE_TAG: u8 = 0xFF;

    /// Decode the persisted selector byte
    pub fn from_byte(value: u8) -> Self {
        if value == Self::BYTE_STORE_TAG {
            StorageSelector::ByteStore
        } else {
            StorageSelector::SdCard { chip_select: value }
        }
    }

    /// Encode as the persisted selector byte
    pub fn to_byte(self) -> u8 {
        match self {
            StorageSelector::ByteStore => Self::BYTE_STORE_TAG,
            StorageSelector::SdCard { chip_select } => chip_select,
        }
    }

    pub fn is_byte_store(self) -> bool {
        matches!(self, StorageSelector::ByteStore)
    }
}

/// Persistent module configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleConfig {
    /// Persisted format tag
    pub file_version: u8,
    /// Number of live peripheral records
    pub peripheral_count: u8,
    /// Address lines in use, 1..=8
    pub address_pin_count: u8,
    /// Address line GPIO numbers, most significant first; unused slots hold [`UNUSED_PIN`]
    pub address_pins: [u8; MAX_ADDRESS_PINS as usize],
    /// Activation signal line
    pub output_pin: u8,
    /// Record storage medium
    pub storage: StorageSelector,
}

impl ModuleConfig {
    /// Highest assignable peripheral number, also the registry capacity
    pub fn capacity(&self) -> u8 {
        // address_pin_count is at most 8, so this fits
        max_address(self.address_pin_count) as u8
    }

    /// Address line GPIO numbers in use
    pub fn address_pins(&self) -> &[u8] {
        let count = (self.address_pin_count as usize).min(self.address_pins.len());
        &self.address_pins[..count]
    }

    /// Check the ranges a loaded configuration must satisfy
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.file_version != FILE_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.file_version));
        }
        if self.address_pin_count == 0 || self.address_pin_count > MAX_ADDRESS_PINS {
            return Err(ConfigError::InvalidPinCount(self.address_pin_count));
        }
        if self.peripheral_count > self.capacity() {
            return Err(ConfigError::CountExceedsCapacity {
                count: self.peripheral_count,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

/// A loaded configuration that cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    UnsupportedVersion(u8),
    InvalidPinCount(u8),
    CountExceedsCapacity { count: u8, capacity: u8 },
}
