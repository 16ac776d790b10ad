//! Byte store emulated in on-board flash
//!
//! The RP2040 has no EEPROM. The last erase sector of the flash chip
//! backs a [`MirroredSector`]. There is no wear levelling, so each changed
//! byte costs one erase cycle.
//!
//! Erased flash reads `0xFF`, so a blank chip never carries the
//! provisioning sentinel and boots into provisioning.

use domos_hal::{MirroredSector, StoreError};
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;

/// Flash size on the target board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Emulated store size: one erase sector
pub const EEPROM_SIZE: usize = ERASE_SIZE;

/// Start of the emulated store in flash; memory.x keeps the program below it
pub const EEPROM_OFFSET: usize = FLASH_SIZE - EEPROM_SIZE;

/// Flash-backed byte store
pub type FlashEeprom<'d> = MirroredSector<Flash<'d, FLASH, Blocking, FLASH_SIZE>, EEPROM_SIZE>;

/// Take the flash peripheral and load the store sector into RAM
pub fn flash_eeprom(flash: Peri<'_, FLASH>) -> Result<FlashEeprom<'_>, StoreError> {
    MirroredSector::new(Flash::new_blocking(flash), EEPROM_OFFSET as u32).map_err(|e| {
        #[cfg(feature = "defmt")]
        defmt::warn!("Flash sector unreadable: {:?}", e);
        e
    })
}
