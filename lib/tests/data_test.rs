#[macro_use]
extern crate assert_matches;

use rs_gaddag::*;

use std::io::Cursor;
use std::result::Result;

macro_rules! assert_words_eq {
    ($word_list:expr, $expected:expr) => {
        assert_eq!(
            $word_list
                .iter()
                .map(|word| word.to_string())
                .collect::<Vec<String>>(),
            $expected
                .iter()
                .map(|word| String::from(*word))
                .collect::<Vec<String>>()
        );
    };
}

#[test]
fn word_list_from_reader_succeeds() -> Result<(), GaddagError> {
    let mut cursor = Cursor::new(String::from("\n\nzoea\n Cat\nact  \n"));

    let words = WordList::from_reader(&mut cursor)?;

    assert_eq!(words.len(), 3);
    assert_words_eq!(&words, &["ACT", "CAT", "ZOEA"]);
    assert_eq!(words.skipped(), 0);
    Ok(())
}

#[test]
fn word_list_from_iterator_dedups() {
    let words = WordList::from_iterator(vec!["", "cat", "CAT ", "cAt", "ta"]);

    assert_eq!(words.len(), 2);
    assert_words_eq!(&words, &["CAT", "TA"]);
}

#[test]
fn word_list_skips_unsupported_words() {
    let words = WordList::from_iterator(vec![
        "don't",
        "c?t",
        "cat",
        "abcdefghijklmnopq",
        "abcdefghijklmnop",
    ]);

    assert_words_eq!(&words, &["ABCDEFGHIJKLMNOP", "CAT"]);
    assert_eq!(words.skipped(), 3);
}

#[test]
fn word_list_contains() -> Result<(), GaddagError> {
    let words = WordList::from_iterator(vec!["cat", "act", "cats"]);

    assert!(words.contains(&encode_word("cats")?));
    assert!(!words.contains(&encode_word("tac")?));
    assert!(!words.contains(&[]));
    Ok(())
}

#[test]
fn word_list_empty() {
    let words = WordList::from_iterator(Vec::<String>::new());

    assert!(words.is_empty());
    assert!(words.words().is_empty());
}

#[test]
fn encode_word_succeeds() -> Result<(), GaddagError> {
    let word = encode_word("Zoea")?;

    assert_eq!(word.as_slice(), &[26, 15, 5, 1]);
    assert_eq!(decode_word(&word), "ZOEA");
    Ok(())
}

#[test]
fn encode_word_errors() {
    assert_matches!(
        encode_word("caté"),
        Err(GaddagError::UnsupportedCharacter('é'))
    );
    assert_matches!(
        encode_word("abcdefghijklmnopq"),
        Err(GaddagError::WordLength(MAX_WORD_LENGTH))
    );
    assert_matches!(encode_word(""), Ok(word) if word.is_empty());
}

#[test]
fn letter_string_conversions() -> Result<(), GaddagError> {
    let word = LetterString::try_from("quiz")?;

    assert_eq!(word.to_string(), "QUIZ");
    assert_eq!(String::from(word), "QUIZ");
    assert_eq!(format!("{:?}", word), "LetterString(\"QUIZ\")");
    assert_matches!(
        LetterString::try_from(String::from("qu1z")),
        Err(GaddagError::UnsupportedCharacter('1'))
    );
    Ok(())
}

#[test]
fn letter_bits_skip_blanks() -> Result<(), GaddagError> {
    let letters = encode_word("b?b")?;

    assert_eq!(letter_bits(&letters), 1 << 2);
    assert_eq!(all_letter_bits(LAST_LETTER).count_ones(), 26);
    assert_eq!(all_letter_bits(LAST_LETTER) & 1, 0);
    Ok(())
}
