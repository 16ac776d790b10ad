//! Persistent layout codec
//!
//! Fixed-offset map of the byte store:
//!
//! ```text
//! 0..2             provisioning sentinel
//! 2..15            ModuleConfig (13 bytes)
//! 15 + 11 * i      PeripheralRecord slot i (10-byte name, 1-byte number)
//! ```
//!
//! Offsets are computed, never stored. Changing a field width or order is
//! a breaking format change.

use domos_hal::ByteStore;
use domos_protocol::MAX_ADDRESS_PINS;

use crate::config::{ModuleConfig, StorageSelector};
use crate::error::LayoutError;
use crate::record::{PeripheralRecord, RECORD_LEN};

/// Bytes marking a provisioned store
pub const SENTINEL: [u8; 2] = [168, 63];

/// Offset of the sentinel
pub const SENTINEL_OFFSET: usize = 0;

/// Persisted width of [`ModuleConfig`]
pub const CONFIG_LEN: usize = 5 + MAX_ADDRESS_PINS as usize;

/// Offset of the peripheral count inside the config
const COUNT_FIELD: usize = 1;

/// Offset of [`ModuleConfig`]
pub const fn offset_of_config() -> usize {
    SENTINEL_OFFSET + SENTINEL.len()
}

/// Unchecked offset of record slot `index`
pub const fn record_offset(index: usize) -> usize {
    offset_of_config() + CONFIG_LEN + index * RECORD_LEN
}

/// Encode the config in persisted field order
pub fn encode_config(config: &ModuleConfig) -> [u8; CONFIG_LEN] {
    let mut bytes = [0u8; CONFIG_LEN];
    bytes[0] = config.file_version;
    bytes[COUNT_FIELD] = config.peripheral_count;
    bytes[2] = config.address_pin_count;
    bytes[3..3 + config.address_pins.len()].copy_from_slice(&config.address_pins);
    bytes[CONFIG_LEN - 2] = config.output_pin;
    bytes[CONFIG_LEN - 1] = config.storage.to_byte();
    bytes
}

/// Decode a persisted config; ranges are checked by [`ModuleConfig::check`]
pub fn decode_config(bytes: &[u8; CONFIG_LEN]) -> ModuleConfig {
    let mut address_pins = [0u8; MAX_ADDRESS_PINS as usize];
    address_pins.copy_from_slice(&bytes[3..3 + MAX_ADDRESS_PINS as usize]);

    ModuleConfig {
        file_version: bytes[0],
        peripheral_count: bytes[COUNT_FIELD],
        address_pin_count: bytes[2],
        address_pins,
        output_pin: bytes[CONFIG_LEN - 2],
        storage: StorageSelector::from_byte(bytes[CONFIG_LEN - 1]),
    }
}

/// Layout codec over a byte store
pub struct Layout<S> {
    store: S,
}

impl<S: ByteStore> Layout<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Offset of record slot `index`
    ///
    /// Fails with [`LayoutError::StoreFull`] when the slot does not fit in
    /// the store.
    pub fn offset_of_record(&self, index: usize) -> Result<usize, LayoutError> {
        let offset = record_offset(index);
        if offset + RECORD_LEN > self.store.capacity() {
            return Err(LayoutError::StoreFull);
        }
        Ok(offset)
    }

    /// Check for the provisioning sentinel
    pub fn is_provisioned(&mut self) -> Result<bool, LayoutError> {
        let mut marker = [0u8; 2];
        self.store.read_into(SENTINEL_OFFSET, &mut marker)?;
        Ok(marker == SENTINEL)
    }

    /// Write the sentinel; done last when provisioning
    pub fn mark_provisioned(&mut self) -> Result<(), LayoutError> {
        self.store.write_from(SENTINEL_OFFSET, &SENTINEL)?;
        Ok(())
    }

    /// Zero the sentinel so the next boot provisions again
    pub fn clear_provisioning(&mut self) -> Result<(), LayoutError> {
        self.store.write_from(SENTINEL_OFFSET, &[0, 0])?;
        Ok(())
    }

    /// Zero the whole store
    pub fn clear_all(&mut self) -> Result<(), LayoutError> {
        self.store.clear()?;
        Ok(())
    }

    pub fn read_config(&mut self) -> Result<ModuleConfig, LayoutError> {
        let mut bytes = [0u8; CONFIG_LEN];
        self.store.read_into(offset_of_config(), &mut bytes)?;
        Ok(decode_config(&bytes))
    }

    pub fn write_config(&mut self, config: &ModuleConfig) -> Result<(), LayoutError> {
        self.store
            .write_from(offset_of_config(), &encode_config(config))?;
        Ok(())
    }

    /// Persist only the peripheral count
    pub fn write_peripheral_count(&mut self, count: u8) -> Result<(), LayoutError> {
        self.store.write(offset_of_config() + COUNT_FIELD, count)?;
        Ok(())
    }

    /// Read slot `index` whole
    pub fn read_record(&mut self, index: usize) -> Result<PeripheralRecord, LayoutError> {
        let offset = self.offset_of_record(index)?;
        let mut bytes = [0u8; RECORD_LEN];
        self.store.read_into(offset, &mut bytes)?;
        PeripheralRecord::from_bytes(&bytes)
    }

    /// Write slot `index` whole: name field first, then the number
    pub fn write_record(
        &mut self,
        index: usize,
        record: &PeripheralRecord,
    ) -> Result<(), LayoutError> {
        let offset = self.offset_of_record(index)?;
        self.store.write_from(offset, &record.to_bytes())?;
        Ok(())
    }
}
