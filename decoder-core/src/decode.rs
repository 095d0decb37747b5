//! International Morse symbol table for sentinel-prefixed pulse codes

use crate::types::PulseCode;

/// Character shown for pulse patterns without a table entry
pub const UNKNOWN_CHAR: char = '*';

/// Every (code, character) pair of the table, letters then digits
pub const TABLE: [(u8, char); 36] = [
    (0x05, 'A'),
    (0x18, 'B'),
    (0x1A, 'C'),
    (0x0C, 'D'),
    (0x02, 'E'),
    (0x12, 'F'),
    (0x0E, 'G'),
    (0x10, 'H'),
    (0x04, 'I'),
    (0x17, 'J'),
    (0x0D, 'K'),
    (0x14, 'L'),
    (0x07, 'M'),
    (0x06, 'N'),
    (0x0F, 'O'),
    (0x16, 'P'),
    (0x1D, 'Q'),
    (0x0A, 'R'),
    (0x08, 'S'),
    (0x03, 'T'),
    (0x09, 'U'),
    (0x11, 'V'),
    (0x0B, 'W'),
    (0x19, 'X'),
    (0x1B, 'Y'),
    (0x1C, 'Z'),
    (0x2F, '1'),
    (0x27, '2'),
    (0x23, '3'),
    (0x21, '4'),
    (0x20, '5'),
    (0x30, '6'),
    (0x38, '7'),
    (0x3C, '8'),
    (0x3E, '9'),
    (0x3F, '0'),
];

/// Decode a pulse code to its character, [`UNKNOWN_CHAR`] if unmapped
pub const fn decode(code: PulseCode) -> char {
    let raw = code.raw();
    let mut i = 0;
    while i < TABLE.len() {
        if TABLE[i].0 == raw {
            return TABLE[i].1;
        }
        i += 1;
    }
    UNKNOWN_CHAR
}

/// Pulse code for a character, `None` if the table has no entry.
///
/// Letters match case-insensitively.
pub fn encode(ch: char) -> Option<PulseCode> {
    let upper = ch.to_ascii_uppercase();
    TABLE
        .iter()
        .find(|(_, c)| *c == upper)
        .map(|(raw, _)| PulseCode::from_raw(*raw))
}
