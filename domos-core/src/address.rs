//! Address encoder
//!
//! Converts a peripheral number into the levels of the address lines.
//! Line 0 carries the most significant bit. The textual decoder in the
//! protocol crate reads binary tokens in the same order without going
//! through this code; the property tests keep the two in agreement.

use domos_protocol::MAX_ADDRESS_PINS;

/// Encoding failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Number does not fit in the available lines
    Overflow,
    /// Line count outside 1..=8
    InvalidPinCount,
}

/// Levels for up to eight address lines, most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressBits {
    bits: [bool; MAX_ADDRESS_PINS as usize],
    len: u8,
}

impl AddressBits {
    /// Line levels in use
    pub fn as_slice(&self) -> &[bool] {
        &self.bits[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Numeric value of the line levels
    pub fn value(&self) -> u16 {
        self.as_slice()
            .iter()
            .fold(0u16, |acc, &bit| (acc << 1) | bit as u16)
    }
}

/// Encode `number` on exactly `pin_count` lines
pub fn encode(number: u16, pin_count: u8) -> Result<AddressBits, AddressError> {
    if pin_count == 0 || pin_count > MAX_ADDRESS_PINS {
        return Err(AddressError::InvalidPinCount);
    }
    if number >= 1u16 << pin_count {
        return Err(AddressError::Overflow);
    }

    let mut bits = [false; MAX_ADDRESS_PINS as usize];
    for (i, bit) in bits.iter_mut().take(pin_count as usize).enumerate() {
        let shift = pin_count as usize - 1 - i;
        *bit = (number >> shift) & 1 == 1;
    }

    Ok(AddressBits {
        bits,
        len: pin_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_order() {
        let bits = encode(3, 3).unwrap();
        assert_eq!(bits.as_slice(), &[false, true, true]);

        let bits = encode(5, 3).unwrap();
        assert_eq!(bits.as_slice(), &[true, false, true]);

        let bits = encode(1, 8).unwrap();
        assert!(bits.as_slice()[7]);
        assert!(bits.as_slice()[..7].iter().all(|&b| !b));
    }

    #[test]
    fn test_exact_width() {
        assert_eq!(encode(0, 1).unwrap().len(), 1);
        assert_eq!(encode(255, 8).unwrap().len(), 8);
    }

    #[test]
    fn test_overflow() {
        assert_eq!(encode(8, 3), Err(AddressError::Overflow));
        assert_eq!(encode(2, 1), Err(AddressError::Overflow));
        assert_eq!(encode(256, 8), Err(AddressError::Overflow));
    }

    #[test]
    fn test_invalid_pin_count() {
        assert_eq!(encode(0, 0), Err(AddressError::InvalidPinCount));
        assert_eq!(encode(0, 9), Err(AddressError::InvalidPinCount));
    }

    #[test]
    fn test_zero_and_value() {
        let none = encode(0, 4).unwrap();
        assert_eq!(none.value(), 0);
        assert!(none.as_slice().iter().all(|&b| !b));
        assert_eq!(encode(6, 3).unwrap().value(), 6);
    }
}
