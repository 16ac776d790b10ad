//! The encoder that drives the address lines and the decoder that reads
//! `b...` tokens are separate code paths. They must agree on bit order.

use domos_core::{encode, AddressError};
use domos_protocol::{decode_binary, parse_address};
use proptest::prelude::*;

fn to_text(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

proptest! {
    #[test]
    fn encode_then_decode_is_identity(pins in 1u8..=8, seed in any::<u16>()) {
        let number = seed % (1u16 << pins);
        let bits = encode(number, pins).unwrap();
        prop_assert_eq!(bits.len(), pins as usize);
        prop_assert_eq!(decode_binary(&to_text(bits.as_slice())), Some(number));
    }

    #[test]
    fn encode_rejects_numbers_past_the_lines(pins in 1u8..=8, excess in 0u16..512) {
        let number = (1u16 << pins) + excess;
        prop_assert_eq!(encode(number, pins), Err(AddressError::Overflow));
    }

    #[test]
    fn binary_token_matches_decimal_token(pins in 1u8..=8, seed in any::<u16>()) {
        let number = seed % (1u16 << pins);
        let bits = encode(number, pins).unwrap();
        let binary = format!("b{}", to_text(bits.as_slice()));
        prop_assert_eq!(
            parse_address(&binary, pins),
            parse_address(&number.to_string(), pins)
        );
    }
}
