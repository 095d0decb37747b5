//! Symbol table coverage

#[cfg(test)]
mod tests {
    use decoder_core::decode::TABLE;
    use decoder_core::{decode, encode, Element, PulseCode, UNKNOWN_CHAR};
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(".-", 'A')]
    #[case("-...", 'B')]
    #[case("-.-.", 'C')]
    #[case(".", 'E')]
    #[case("..-.", 'F')]
    #[case(".---", 'J')]
    #[case("--.-", 'Q')]
    #[case("...", 'S')]
    #[case("-", 'T')]
    #[case("-.--", 'Y')]
    #[case("--..", 'Z')]
    #[case(".----", '1')]
    #[case(".....", '5')]
    #[case("-....", '6')]
    #[case("----.", '9')]
    #[case("-----", '0')]
    fn test_pattern_decodes(#[case] pattern: &str, #[case] expected: char) {
        assert_eq!(decode(PulseCode::from_pattern(pattern)), expected);
    }

    #[rstest]
    #[case(0x00)]
    #[case(0x01)]
    #[case(0x13)]
    #[case(0x15)]
    #[case(0x1E)]
    #[case(0x1F)]
    #[case(0x22)]
    #[case(0x2A)]
    #[case(0x40)]
    #[case(0x80)]
    #[case(0xFF)]
    fn test_unmapped_codes_are_unknown(#[case] raw: u8) {
        assert_eq!(decode(PulseCode::from_raw(raw)), UNKNOWN_CHAR);
    }

    #[test]
    fn test_table_codes_are_unique() {
        for (i, (code_a, ch_a)) in TABLE.iter().enumerate() {
            for (code_b, ch_b) in TABLE.iter().skip(i + 1) {
                assert_ne!(code_a, code_b);
                assert_ne!(ch_a, ch_b);
            }
        }
    }

    #[test]
    fn test_encode_inverts_table() {
        for &(raw, ch) in TABLE.iter() {
            assert_eq!(encode(ch), Some(PulseCode::from_raw(raw)));
            assert_eq!(encode(ch.to_ascii_lowercase()), Some(PulseCode::from_raw(raw)));
        }
        assert_eq!(encode('?'), None);
        assert_eq!(encode(' '), None);
    }

    #[test]
    fn test_overlong_pattern_saturates_to_unknown() {
        let code = PulseCode::from_pattern("........");
        assert_eq!(code.len(), PulseCode::MAX_ELEMENTS);
        assert!(code.raw() >= 0x80);
        assert_eq!(decode(code), UNKNOWN_CHAR);
    }

    proptest! {
        #[test]
        fn prop_decode_is_total(raw in any::<u8>()) {
            let ch = decode(PulseCode::from_raw(raw));
            match TABLE.iter().find(|(code, _)| *code == raw) {
                Some(&(_, expected)) => prop_assert_eq!(ch, expected),
                None => prop_assert_eq!(ch, UNKNOWN_CHAR),
            }
        }

        #[test]
        fn prop_pattern_roundtrips_through_elements(pattern in "[.-]{1,7}") {
            let code = PulseCode::from_pattern(&pattern);
            let keyed: String = code
                .elements()
                .map(|e| match e {
                    Element::Dot => '.',
                    Element::Dash => '-',
                })
                .collect();
            prop_assert_eq!(keyed, pattern);
        }
    }
}
