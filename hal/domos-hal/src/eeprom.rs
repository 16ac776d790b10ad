//! Byte-addressable persistent storage
//!
//! The registry keeps its whole state in a small EEPROM-like medium:
//! every address holds one byte and survives power loss. Implementations
//! may be a real EEPROM or an emulation on top of flash.

/// Errors from byte store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Address is outside the store's bounded address space
    OutOfBounds,
    /// The underlying medium reported a failure
    Device,
}

/// Bounded byte store
///
/// Addresses run from `0` to `capacity() - 1`. A write of several bytes is
/// a sequence of independent single-byte writes; nothing here makes a
/// multi-byte update atomic.
pub trait ByteStore {
    /// Number of addressable bytes
    fn capacity(&self) -> usize;

    /// Read the byte at `address`
    fn read(&mut self, address: usize) -> Result<u8, StoreError>;

    /// Write `value` at `address`
    fn write(&mut self, address: usize, value: u8) -> Result<(), StoreError>;

    /// Read `buffer.len()` consecutive bytes starting at `address`
    fn read_into(&mut self, address: usize, buffer: &mut [u8]) -> Result<(), StoreError> {
        for (offset, byte) in buffer.iter_mut().enumerate() {
            *byte = self.read(address + offset)?;
        }
        Ok(())
    }

    /// Write `data` to consecutive bytes starting at `address`
    fn write_from(&mut self, address: usize, data: &[u8]) -> Result<(), StoreError> {
        for (offset, &byte) in data.iter().enumerate() {
            self.write(address + offset, byte)?;
        }
        Ok(())
    }

    /// Set every byte of the store to zero
    ///
    /// Bytes that already read zero are not rewritten. Flash-backed
    /// implementations should override this with a bulk erase.
    fn clear(&mut self) -> Result<(), StoreError> {
        for address in 0..self.capacity() {
            if self.read(address)? != 0 {
                self.write(address, 0)?;
            }
        }
        Ok(())
    }
}
