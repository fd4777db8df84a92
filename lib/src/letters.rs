//! Conversion between display text and the letter codes stored in a GADDAG.
//!
//! Code 0 is reserved: on a rack it is a blank tile, inside a GADDAG pattern it is the
//! direction-switch delimiter. Codes `FIRST_LETTER..=LAST_LETTER` are `A` through `Z`.

use crate::fixed::{LetterString, MAX_WORD_LENGTH};
use crate::results::*;

pub type Letter = u8;

/// A rack tile that can stand in for any letter.
pub const BLANK: Letter = 0;
/// Separates the reversed prefix from the forward suffix of a GADDAG pattern.
pub const DELIMITER: Letter = 0;
pub const FIRST_LETTER: Letter = 1;
pub const LAST_LETTER: Letter = 26;
/// The number of codes, including the blank/delimiter code.
pub const ALPHABET_SIZE: usize = LAST_LETTER as usize + 1;
/// How a blank is written in text.
pub const BLANK_CHAR: char = '?';

/// Encodes a single character. Letters are accepted in either case.
pub fn encode_letter(c: char) -> Result<Letter> {
    if c == BLANK_CHAR {
        return Ok(BLANK);
    }
    if !c.is_ascii_alphabetic() {
        return Err(GaddagError::UnsupportedCharacter(c));
    }
    Ok(FIRST_LETTER + (c.to_ascii_uppercase() as u8 - b'A'))
}

/// Decodes a single letter code into its upper-case display character.
pub fn decode_letter(letter: Letter) -> char {
    if letter == BLANK {
        return BLANK_CHAR;
    }
    (b'A' + (letter - FIRST_LETTER)) as char
}

/// Encodes a word, failing if it has an unsupported character or more than
/// [`MAX_WORD_LENGTH`] letters.
pub fn encode_word(word: &str) -> Result<LetterString> {
    let mut encoded = LetterString::new();
    for c in word.chars() {
        if encoded.len() == MAX_WORD_LENGTH {
            return Err(GaddagError::WordLength(MAX_WORD_LENGTH));
        }
        encoded.push(encode_letter(c)?);
    }
    Ok(encoded)
}

pub fn decode_word(word: &[Letter]) -> String {
    word.iter().map(|letter| decode_letter(*letter)).collect()
}

/// Returns a bitmask with bit `l` set for every concrete (non-blank) letter `l`.
pub fn letter_bits(letters: &[Letter]) -> u64 {
    letters
        .iter()
        .filter(|letter| **letter != BLANK)
        .fold(0, |bits, letter| bits | (1 << letter))
}

/// Returns the bitmask of every letter from `FIRST_LETTER` to `last_letter`, inclusive.
pub fn all_letter_bits(last_letter: Letter) -> u64 {
    let through_last = if last_letter >= 63 {
        u64::MAX
    } else {
        (1u64 << (last_letter + 1)) - 1
    };
    through_last & !((1u64 << FIRST_LETTER) - 1)
}
