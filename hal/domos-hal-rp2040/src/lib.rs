//! RP2040-specific HAL for the DomoS registry firmware
//!
//! Implements the `domos-hal` traits on top of `embassy-rp`:
//!
//! - Byte store emulated in the last flash sector
//! - Runtime pin allocation for config-driven address lines
//! - GPIO address lines
//! - PWM activation output
//! - Buffered UART console

#![no_std]
#![deny(unsafe_code)]

pub mod eeprom;
pub mod gpio;
pub mod pins;
pub mod pwm;
pub mod uart;

pub use eeprom::{flash_eeprom, FlashEeprom};
pub use gpio::AddressLine;
pub use pins::{PinBank, PinError};
pub use pwm::PwmLevelOutput;
pub use uart::{ConsoleRx, ConsoleTx};
