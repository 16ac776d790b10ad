//! GPIO address lines

use domos_hal::OutputPin;
use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;

/// Push-pull address line, low at start
pub struct AddressLine {
    pin: Output<'static>,
}

impl AddressLine {
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl OutputPin for AddressLine {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
