// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot encodings for literal values.
//!
//! Every state slot is a self-contained byte string: static kinds occupy one 32-byte word,
//! dynamic kinds carry a leading length word followed by word-padded payload. There is no
//! offset header anywhere; slots are addressed by index, so the usual dynamic-type offset
//! word is stripped at encoding time. The byte-level rules are written down in
//! `docs/format.md`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Size of one state-slot word in bytes.
pub const WORD_BYTES: usize = 32;

/// Size of an account address in bytes.
pub const ADDRESS_BYTES: usize = 20;

/// A single 32-byte big-endian word.
pub type Word = [u8; WORD_BYTES];

/// A 160-bit account address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex(&self.0))
    }
}

/// Builds the word for a `uint256` value that fits in 128 bits.
#[must_use]
pub fn uint256_word(value: u128) -> Word {
    let mut word = [0_u8; WORD_BYTES];
    word[WORD_BYTES - 16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Builds a length word holding `count`.
pub(crate) fn length_word(count: usize) -> Word {
    let mut word = [0_u8; WORD_BYTES];
    word[WORD_BYTES - 8..].copy_from_slice(&(count as u64).to_be_bytes());
    word
}

/// Zero-pads `out` up to the next word boundary.
pub(crate) fn pad_to_word(out: &mut Vec<u8>) {
    out.resize(out.len().next_multiple_of(WORD_BYTES), 0);
}

/// Slot encoding of a `uint256` word.
#[must_use]
pub fn encode_uint256(word: Word) -> Vec<u8> {
    word.to_vec()
}

/// Slot encoding of a `bool`: a full word holding 0 or 1.
#[must_use]
pub fn encode_bool(value: bool) -> Vec<u8> {
    let mut word = [0_u8; WORD_BYTES];
    word[WORD_BYTES - 1] = u8::from(value);
    word.to_vec()
}

/// Slot encoding of an `address`: 20 bytes left-padded to a word.
#[must_use]
pub fn encode_address(address: Address) -> Vec<u8> {
    let mut word = [0_u8; WORD_BYTES];
    word[WORD_BYTES - ADDRESS_BYTES..].copy_from_slice(&address.0);
    word.to_vec()
}

/// Slot encoding of a `bytes32` word, kept verbatim.
#[must_use]
pub fn encode_bytes32(word: Word) -> Vec<u8> {
    word.to_vec()
}

/// Slot encoding of `bytes`: a length word (byte count) followed by the data,
/// zero-padded to a word boundary.
#[must_use]
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD_BYTES + data.len().next_multiple_of(WORD_BYTES));
    out.extend_from_slice(&length_word(data.len()));
    out.extend_from_slice(data);
    pad_to_word(&mut out);
    out
}

/// Slot encoding of a `string`: its UTF-8 bytes, encoded like [`encode_bytes`].
#[must_use]
pub fn encode_str(text: &str) -> Vec<u8> {
    encode_bytes(text.as_bytes())
}

/// Slot encoding of `uint256[]`: a length word (element count) followed by one
/// word per element.
#[must_use]
pub fn encode_uint256_array(words: &[Word]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD_BYTES * (1 + words.len()));
    out.extend_from_slice(&length_word(words.len()));
    for word in words {
        out.extend_from_slice(word);
    }
    out
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Renders `bytes` as lowercase hex with a `0x` prefix.
#[must_use]
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for &byte in bytes {
        out.push(HEX_DIGITS[usize::from(byte >> 4)] as char);
        out.push(HEX_DIGITS[usize::from(byte & 0x0F)] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn uint256_word_is_big_endian() {
        let word = uint256_word(0x0102);
        assert_eq!(word[WORD_BYTES - 1], 0x02);
        assert_eq!(word[WORD_BYTES - 2], 0x01);
        assert!(word[..WORD_BYTES - 2].iter().all(|&b| b == 0));
    }

    #[test]
    fn bool_encodes_to_zero_or_one_word() {
        let t = encode_bool(true);
        let f = encode_bool(false);
        assert_eq!(t.len(), WORD_BYTES);
        assert_eq!(t[WORD_BYTES - 1], 1);
        assert_eq!(f, vec![0_u8; WORD_BYTES]);
    }

    #[test]
    fn address_is_left_padded() {
        let slot = encode_address(Address([0xAA; ADDRESS_BYTES]));
        assert_eq!(slot.len(), WORD_BYTES);
        assert!(slot[..12].iter().all(|&b| b == 0));
        assert!(slot[12..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn bytes_carry_length_word_and_padding() {
        let slot = encode_bytes(&[0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF]);
        assert_eq!(slot.len(), 2 * WORD_BYTES);
        assert_eq!(slot[..WORD_BYTES], length_word(8));
        assert_eq!(
            slot[WORD_BYTES..WORD_BYTES + 8],
            [0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF]
        );
        assert!(slot[WORD_BYTES + 8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_bytes_is_a_single_zero_length_word() {
        assert_eq!(encode_bytes(&[]), vec![0_u8; WORD_BYTES]);
    }

    #[test]
    fn word_aligned_bytes_get_no_padding() {
        let slot = encode_bytes(&[0x11; WORD_BYTES]);
        assert_eq!(slot.len(), 2 * WORD_BYTES);
    }

    #[test]
    fn str_encodes_like_its_utf8_bytes() {
        assert_eq!(encode_str("hi"), encode_bytes(b"hi"));
    }

    #[test]
    fn uint256_array_is_length_then_words() {
        let slot = encode_uint256_array(&[uint256_word(1), uint256_word(2)]);
        assert_eq!(slot.len(), 3 * WORD_BYTES);
        assert_eq!(slot[..WORD_BYTES], length_word(2));
        assert_eq!(slot[2 * WORD_BYTES - 1], 1);
        assert_eq!(slot[3 * WORD_BYTES - 1], 2);
    }

    #[test]
    fn hex_renders_lowercase_with_prefix() {
        assert_eq!(hex(&[]), "0x");
        assert_eq!(hex(&[0x00, 0xAB, 0xFF]), "0x00abff");
    }
}
