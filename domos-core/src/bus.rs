//! Signal bus: address lines plus the activation output
//!
//! Activating a peripheral is a timed sequence:
//!
//! ```text
//! output = level      hold OUTPUT_SETTLE_MS
//! address = number    hold ADDRESS_PROPAGATION_MS
//! output = 0
//! address = 0
//! ```
//!
//! The output is driven before the address so no other device is selected
//! while the level is still changing. The sequence blocks; nothing else
//! runs until it is done.
//!
//! # Usage
//!
//! ```ignore
//! let mut bus = SignalBus::new(lines, pwm);
//! let bits = encode(3, bus.line_count())?;
//! bus.activate(&bits, DriveLevel::HIGH, &mut delay);
//! ```

use domos_hal::{AnalogOutput, OutputPin};
use domos_protocol::{DriveLevel, MAX_ADDRESS_PINS};
use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::address::AddressBits;

/// Hold after changing the output, for the RC filter to settle
pub const OUTPUT_SETTLE_MS: u32 = 300;

/// Hold with the address applied
pub const ADDRESS_PROPAGATION_MS: u32 = 1000;

/// Address lines, most significant first
pub type AddressLines<P> = Vec<P, { MAX_ADDRESS_PINS as usize }>;

/// Address lines and activation output
pub struct SignalBus<P, A> {
    lines: AddressLines<P>,
    output: A,
}

impl<P: OutputPin, A: AnalogOutput> SignalBus<P, A> {
    /// Create a bus and drive everything to the idle state
    pub fn new(lines: AddressLines<P>, output: A) -> Self {
        let mut bus = Self { lines, output };
        bus.output.off();
        bus.deselect();
        bus
    }

    /// Number of address lines
    pub fn line_count(&self) -> u8 {
        self.lines.len() as u8
    }

    pub fn lines(&self) -> &[P] {
        &self.lines
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    /// Apply address levels; extra levels or lines are ignored
    pub fn select(&mut self, bits: &AddressBits) {
        for (line, &high) in self.lines.iter_mut().zip(bits.as_slice()) {
            line.set_state(high);
        }
    }

    /// Drive every address line low
    pub fn deselect(&mut self) {
        for line in self.lines.iter_mut() {
            line.set_low();
        }
    }

    /// Run the activation sequence for one peripheral
    pub fn activate<D: DelayNs>(&mut self, bits: &AddressBits, level: DriveLevel, delay: &mut D) {
        self.output.set_level(level.value());
        delay.delay_ms(OUTPUT_SETTLE_MS);

        self.select(bits);
        delay.delay_ms(ADDRESS_PROPAGATION_MS);

        self.output.off();
        self.deselect();
    }
}
