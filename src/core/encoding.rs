//! Byte layout of the card-creation request body.
//!
//! ```text
//! 0x0A <len(front)> <front utf-8> 0x0A <len(back)> <back utf-8> <deck suffix>
//! ```
//!
//! Lengths use a base-128 continuation-bit prefix: below 128 a single byte,
//! otherwise `128 + len % 128` followed by `len / 128` (and further groups
//! only for texts of 16384 bytes or more).

use crate::core::deck::DeckFormat;

/// Tag byte preceding each text field.
pub const TEXT_FIELD_TAG: u8 = 0x0A;

/// Appends `value` as a base-128 varint.
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let low7 = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(low7);
            return;
        }
        buf.push(low7 | 0x80);
    }
}

pub fn encode_length(len: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2);
    write_varint(&mut buf, len as u64);
    buf
}

fn write_text_field(buf: &mut Vec<u8>, text: &str) {
    let bytes = text.as_bytes();
    buf.push(TEXT_FIELD_TAG);
    write_varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Header shared by every deck: both text fields with their length prefixes.
pub fn encode_text_section(front: &str, back: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(front.len() + back.len() + 6);
    write_text_field(&mut buf, front);
    write_text_field(&mut buf, back);
    buf
}

pub fn encode_payload(front: &str, back: &str, deck: &DeckFormat) -> Vec<u8> {
    let mut payload = encode_text_section(front, back);
    payload.extend_from_slice(deck.suffix());
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::DeckRegistry;

    #[test]
    fn test_short_lengths_are_single_byte() {
        for len in [0usize, 1, 2, 64, 127] {
            assert_eq!(encode_length(len), vec![len as u8]);
        }
    }

    #[test]
    fn test_long_lengths_are_two_bytes() {
        for len in [128usize, 129, 255, 256, 260, 1000, 16383] {
            assert_eq!(
                encode_length(len),
                vec![(128 + len % 128) as u8, (len / 128) as u8],
                "length {}",
                len
            );
        }
    }

    #[test]
    fn test_very_long_lengths_keep_continuing() {
        assert_eq!(encode_length(16384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn test_example_header() {
        let back = "A".repeat(128);
        let section = encode_text_section("Hi", &back);

        let mut expected = vec![0x0A, 0x02, b'H', b'i', 0x0A, 0x80, 0x01];
        expected.extend(std::iter::repeat(b'A').take(128));
        assert_eq!(section, expected);
    }

    #[test]
    fn test_prefix_counts_utf8_bytes() {
        // "ă" is two bytes in UTF-8
        let section = encode_text_section("ă", "");
        assert_eq!(section, vec![0x0A, 0x02, 0xC4, 0x83, 0x0A, 0x00]);
    }

    #[test]
    fn test_payload_ends_with_deck_suffix() {
        let registry = DeckRegistry::builtin();
        let deck = registry.resolve("life_tricks");
        let payload = encode_payload("front", "back", deck);

        assert!(payload.ends_with(deck.suffix()));
        assert_eq!(
            payload.len(),
            encode_text_section("front", "back").len() + deck.suffix().len()
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let registry = DeckRegistry::builtin();
        let deck = registry.resolve("test");
        let a = encode_payload("Word 1", "Definition 1", deck);
        let b = encode_payload("Word 1", "Definition 1", deck);
        assert_eq!(a, b);
    }
}
