//! Shared helpers for integration tests

use domos_hal::{ByteStore, StoreError};

/// In-memory byte store
pub struct RamStore {
    bytes: Vec<u8>,
}

impl RamStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }
}

impl ByteStore for RamStore {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, address: usize) -> Result<u8, StoreError> {
        self.bytes.get(address).copied().ok_or(StoreError::OutOfBounds)
    }

    fn write(&mut self, address: usize, value: u8) -> Result<(), StoreError> {
        let slot = self.bytes.get_mut(address).ok_or(StoreError::OutOfBounds)?;
        *slot = value;
        Ok(())
    }
}
