//! Runtime pin allocation
//!
//! Address line numbers come from the provisioned module config, so the
//! firmware cannot name the pins at compile time. Free GPIOs go into a
//! [`PinBank`] and are taken back out by number.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Fill a [`PinBank`] from named peripherals
///
/// Usage:
/// ```ignore
/// let mut bank = pin_bank!(p; 2 => PIN_2, 3 => PIN_3, 4 => PIN_4);
/// let pin = bank.take(3)?;
/// ```
#[macro_export]
macro_rules! pin_bank {
    ($p:expr; $($num:literal => $pin:ident),* $(,)?) => {{
        let mut bank = $crate::pins::PinBank::new();
        $(
            bank.insert($num, embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.$pin));
        )*
        bank
    }};
}

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken, or used by the UART or the PWM output
    AlreadyTaken(u8),
}

/// GPIOs available for address lines, indexed by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Empty bank
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT],
        }
    }

    /// Put pin `pin_num` in the bank; out-of-range numbers are ignored
    pub fn insert(&mut self, pin_num: u8, pin: Peri<'static, AnyPin>) {
        if let Some(slot) = self.pins.get_mut(pin_num as usize) {
            *slot = Some(pin);
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin(pin_num))?
            .take()
            .ok_or(PinError::AlreadyTaken(pin_num))
    }
}

impl Default for PinBank {
    fn default() -> Self {
        Self::new()
    }
}
