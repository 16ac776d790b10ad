//! Drive level argument of the `turn` command
//!
//! The first character of the token selects the form:
//! - `h` / `l`: fixed high / low signal
//! - `%p`: percentage, `0..=100`
//! - `vX`: voltage in `0..=5`, decimal fraction allowed

use crate::errors::ParseError;

/// Volts represented by full scale
const FULL_SCALE_VOLTS: f32 = 5.0;

/// Output level on an 8-bit scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveLevel(pub u8);

impl DriveLevel {
    /// Logic high
    pub const HIGH: DriveLevel = DriveLevel(255);
    /// Logic low
    pub const LOW: DriveLevel = DriveLevel(0);

    /// Raw 8-bit value
    pub fn value(self) -> u8 {
        self.0
    }

    /// Level for a percentage of full scale
    pub fn from_percent(percent: u8) -> Result<Self, ParseError> {
        if percent > 100 {
            return Err(ParseError::PercentOutOfRange);
        }
        Ok(DriveLevel((percent as u16 * 255 / 100) as u8))
    }

    /// Level for a voltage on a 0-5 V scale
    pub fn from_volts(volts: f32) -> Result<Self, ParseError> {
        if volts.is_nan() {
            return Err(ParseError::StrangeTurnParameter);
        }
        if volts < 0.0 {
            return Err(ParseError::VoltageTooLow);
        }
        if volts > FULL_SCALE_VOLTS {
            return Err(ParseError::VoltageTooHigh);
        }
        Ok(DriveLevel((volts * 255.0 / FULL_SCALE_VOLTS) as u8))
    }

    /// Parse a `turn` level token
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        let mut chars = token.chars();
        let prefix = chars.next().ok_or(ParseError::StrangeTurnParameter)?;
        let rest = chars.as_str();

        match prefix {
            'h' => Ok(DriveLevel::HIGH),
            'l' => Ok(DriveLevel::LOW),
            '%' => {
                let percent: i32 = match rest.parse() {
                    Ok(percent) => percent,
                    // Too many digits for i32 is simply out of range
                    Err(_) if is_integer(rest) => return Err(ParseError::PercentOutOfRange),
                    Err(_) => return Err(ParseError::StrangeTurnParameter),
                };
                let percent =
                    u8::try_from(percent).map_err(|_| ParseError::PercentOutOfRange)?;
                Self::from_percent(percent)
            }
            'v' => {
                let volts: f32 = rest
                    .parse()
                    .map_err(|_| ParseError::StrangeTurnParameter)?;
                Self::from_volts(volts)
            }
            _ => Err(ParseError::StrangeTurnParameter),
        }
    }
}

/// Optional sign followed by at least one digit
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
