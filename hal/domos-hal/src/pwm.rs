//! Analog output abstraction
//!
//! The activation signal is an 8-bit level. On most controllers this is a
//! PWM output smoothed by an RC filter, which is why callers hold the level
//! for a while before relying on it.

/// 8-bit analog output line
pub trait AnalogOutput {
    /// Drive the line to `level` (0 = off, 255 = full scale)
    fn set_level(&mut self, level: u8);

    /// Level most recently driven
    fn level(&self) -> u8;

    /// Drive the line to zero
    fn off(&mut self) {
        self.set_level(0);
    }
}
