//! Byte store emulated on one erase sector of NOR flash
//!
//! The sector is mirrored in RAM. Reads come from the mirror and every
//! change erases and reprograms the whole sector, so each changing write
//! costs one erase cycle. The mirror only takes a new image once the flash
//! has accepted it; after a failed program it still holds what was last
//! stored successfully.

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};

use crate::eeprom::{ByteStore, StoreError};

/// `ByteStore` over an `N`-byte flash sector starting at `offset`
pub struct MirroredSector<F, const N: usize> {
    flash: F,
    offset: u32,
    mirror: [u8; N],
}

impl<F: NorFlash, const N: usize> MirroredSector<F, N> {
    /// Load the sector at `offset` into RAM
    pub fn new(mut flash: F, offset: u32) -> Result<Self, StoreError> {
        let mut mirror = [0xFF; N];
        flash
            .read(offset, &mut mirror)
            .map_err(|_| StoreError::Device)?;
        Ok(Self {
            flash,
            offset,
            mirror,
        })
    }

    /// Erase the sector, program `image`, then adopt it as the mirror
    fn program(&mut self, image: [u8; N]) -> Result<(), StoreError> {
        let end = self.offset + N as u32;
        self.flash
            .erase(self.offset, end)
            .map_err(|_| StoreError::Device)?;
        self.flash
            .write(self.offset, &image)
            .map_err(|_| StoreError::Device)?;
        self.mirror = image;
        Ok(())
    }

    fn check_range(address: usize, len: usize) -> Result<(), StoreError> {
        match address.checked_add(len) {
            Some(end) if end <= N => Ok(()),
            _ => Err(StoreError::OutOfBounds),
        }
    }
}

impl<F: NorFlash, const N: usize> ByteStore for MirroredSector<F, N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, address: usize) -> Result<u8, StoreError> {
        self.mirror
            .get(address)
            .copied()
            .ok_or(StoreError::OutOfBounds)
    }

    fn write(&mut self, address: usize, value: u8) -> Result<(), StoreError> {
        self.write_from(address, &[value])
    }

    fn read_into(&mut self, address: usize, buffer: &mut [u8]) -> Result<(), StoreError> {
        Self::check_range(address, buffer.len())?;
        buffer.copy_from_slice(&self.mirror[address..address + buffer.len()]);
        Ok(())
    }

    // One sector rewrite per call instead of one per byte
    fn write_from(&mut self, address: usize, data: &[u8]) -> Result<(), StoreError> {
        Self::check_range(address, data.len())?;
        let range = address..address + data.len();
        if self.mirror[range.clone()] == *data {
            return Ok(());
        }
        let mut image = self.mirror;
        image[range].copy_from_slice(data);
        self.program(image)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.mirror.iter().all(|&b| b == 0) {
            return Ok(());
        }
        self.program([0; N])
    }
}
