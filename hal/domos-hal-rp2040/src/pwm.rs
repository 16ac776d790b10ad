//! PWM activation output
//!
//! The 8-bit level becomes a PWM duty cycle; the board's RC filter turns
//! it into a voltage.

use domos_hal::AnalogOutput;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

// Counter runs 0..=254, so a compare value of `level` gives level/255
// duty and 255 holds the line high.
const PWM_TOP: u16 = 254;

/// Analog output on PWM channel A
pub struct PwmLevelOutput<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    level: u8,
}

impl<'d> PwmLevelOutput<'d> {
    /// Wrap a channel A output, starting at level 0
    pub fn new(mut pwm: Pwm<'d>) -> Self {
        let mut config = PwmConfig::default();
        config.top = PWM_TOP;
        config.compare_a = 0;
        pwm.set_config(&config);
        Self {
            pwm,
            config,
            level: 0,
        }
    }
}

impl AnalogOutput for PwmLevelOutput<'_> {
    fn set_level(&mut self, level: u8) {
        self.config.compare_a = level as u16;
        self.pwm.set_config(&self.config);
        self.level = level;
    }

    fn level(&self) -> u8 {
        self.level
    }
}
