//! Provisioning validation
//!
//! Provisioning data comes from outside the registry (on the firmware it is
//! compiled in from `module.toml`). It is checked here once more before the
//! first configuration is written.

use domos_protocol::MAX_ADDRESS_PINS;

use super::types::{ModuleConfig, StorageSelector, DEFAULT_OUTPUT_PIN, FILE_VERSION, UNUSED_PIN};

/// Provisioning data for a blank module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProvisioningRequest<'a> {
    /// Address line GPIO numbers, most significant first
    pub address_pins: &'a [u8],
    /// Activation signal line
    pub output_pin: u8,
    /// Chip-select line of the alternate medium, `None` for the byte store
    pub storage_chip_select: Option<u8>,
}

/// Rejected provisioning data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProvisionError {
    /// No address lines given
    NoAddressPins,
    /// More than eight address lines
    TooManyAddressPins(usize),
    /// A line is used twice
    DuplicatePin(u8),
    /// An address line is also the output line
    OutputPinConflict(u8),
    /// `0xFF` marks unused slots and cannot be a line number
    ReservedPin,
}

impl<'a> ProvisioningRequest<'a> {
    /// Request using the default output line and the byte store
    pub fn new(address_pins: &'a [u8]) -> Self {
        Self {
            address_pins,
            output_pin: DEFAULT_OUTPUT_PIN,
            storage_chip_select: None,
        }
    }

    /// Validate and build the initial configuration
    pub fn validate(&self) -> Result<ModuleConfig, ProvisionError> {
        let pins = self.address_pins;
        if pins.is_empty() {
            return Err(ProvisionError::NoAddressPins);
        }
        if pins.len() > MAX_ADDRESS_PINS as usize {
            return Err(ProvisionError::TooManyAddressPins(pins.len()));
        }
        if self.output_pin == UNUSED_PIN {
            return Err(ProvisionError::ReservedPin);
        }

        let mut address_pins = [UNUSED_PIN; MAX_ADDRESS_PINS as usize];
        for (i, &pin) in pins.iter().enumerate() {
            if pin == UNUSED_PIN {
                return Err(ProvisionError::ReservedPin);
            }
            if pin == self.output_pin {
                return Err(ProvisionError::OutputPinConflict(pin));
            }
            if pins[..i].contains(&pin) {
                return Err(ProvisionError::DuplicatePin(pin));
            }
            address_pins[i] = pin;
        }

        let storage = match self.storage_chip_select {
            None => StorageSelector::ByteStore,
            Some(UNUSED_PIN) => return Err(ProvisionError::ReservedPin),
            Some(cs) if cs == self.output_pin || pins.contains(&cs) => {
                return Err(ProvisionError::DuplicatePin(cs))
            }
            Some(chip_select) => StorageSelector::SdCard { chip_select },
        };

        Ok(ModuleConfig {
            file_version: FILE_VERSION,
            peripheral_count: 0,
            address_pin_count: pins.len() as u8,
            address_pins,
            output_pin: self.output_pin,
            storage,
        })
    }
}
