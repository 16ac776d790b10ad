//! Address arguments of the `create ... as <address>` form
//!
//! An address is either decimal (`as 5`) or binary with a leading `b`
//! (`as b101`). Binary digits are read most significant first. Decoding
//! here is deliberately independent from the encoder that drives the
//! address lines; both use plain big-endian bit order.

use crate::errors::ParseError;

/// Maximum number of address lines
pub const MAX_ADDRESS_PINS: u8 = 8;

/// Highest address reachable with `pin_count` lines
///
/// Address 0 is reserved, so this is also the registry capacity.
pub fn max_address(pin_count: u8) -> u16 {
    let pins = pin_count.min(MAX_ADDRESS_PINS);
    (1u16 << pins) - 1
}

/// Decode a string of `0`/`1` digits, most significant first
///
/// Returns `None` for an empty string, a non-binary digit, or more than
/// 16 digits.
pub fn decode_binary(bits: &str) -> Option<u16> {
    if bits.is_empty() || bits.len() > 16 {
        return None;
    }
    let mut value: u16 = 0;
    for digit in bits.bytes() {
        let bit = match digit {
            b'0' => 0,
            b'1' => 1,
            _ => return None,
        };
        value = (value << 1) | bit;
    }
    Some(value)
}

/// Parse an address token against the current address line count
///
/// Zero is returned as-is; rejecting it is the registry's job.
pub fn parse_address(token: &str, pin_count: u8) -> Result<u8, ParseError> {
    let value = if let Some(bits) = token.strip_prefix('b') {
        if bits.len() > pin_count as usize {
            return Err(ParseError::BinaryNumberTooLong);
        }
        decode_binary(bits).ok_or(ParseError::AddressMalformed)?
    } else {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::AddressMalformed);
        }
        // Too many digits for u32 is simply too big
        let value: u32 = token
            .parse()
            .map_err(|_| ParseError::DecimalNumberTooBig)?;
        if value > max_address(pin_count) as u32 {
            return Err(ParseError::DecimalNumberTooBig);
        }
        value as u16
    };

    // Binary width is bounded by pin_count, decimal by max_address
    u8::try_from(value).map_err(|_| ParseError::DecimalNumberTooBig)
}
