use crate::fixed::LetterString;
use crate::letters::*;
use crate::results::*;
use std::io::BufRead;
use std::slice::Iter;
use tracing::warn;

/// Contains the encoded words to compile into a GADDAG.
///
/// Words are kept sorted and free of duplicates, so that the same words always produce the same
/// structure no matter what order they were read in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<LetterString>,
    skipped: usize,
}

impl WordList {
    /// Constructs a new `WordList` by reading words from the given reader.
    ///
    /// The reader should provide one word per line. Surrounding whitespace is trimmed and blank
    /// lines are ignored. Words with unsupported characters, or that are too long, are logged
    /// and skipped.
    pub fn from_reader<R: BufRead>(word_reader: R) -> Result<Self> {
        let lines = word_reader
            .lines()
            .collect::<std::result::Result<Vec<String>, std::io::Error>>()?;
        Ok(WordList::from_iterator(lines))
    }

    /// Constructs a new `WordList` from the given words.
    ///
    /// Each word is trimmed and case-folded. Blank words are ignored, and words that cannot be
    /// encoded are logged and skipped.
    pub fn from_iterator<S, I>(words: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut skipped = 0;
        let mut encoded: Vec<LetterString> = words
            .into_iter()
            .filter_map(|word| {
                let word = word.as_ref().trim();
                if word.is_empty() {
                    return None;
                }
                match encode_word(word) {
                    Ok(encoded) if encoded.contains(&BLANK) => {
                        warn!(word, "skipping word containing a blank");
                        skipped += 1;
                        None
                    }
                    Ok(encoded) => Some(encoded),
                    Err(err) => {
                        warn!(word, %err, "could not encode word");
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();
        encoded.sort_unstable();
        encoded.dedup();
        WordList {
            words: encoded,
            skipped,
        }
    }

    /// Returns the words in ascending letter-code order.
    pub fn words(&self) -> &[LetterString] {
        &self.words
    }

    pub fn iter(&self) -> Iter<'_, LetterString> {
        self.words.iter()
    }

    /// Returns the number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the number of input words that were skipped because they could not be encoded.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns `true` iff the exact letter sequence is in this list.
    pub fn contains(&self, word: &[Letter]) -> bool {
        self.words
            .binary_search_by(|candidate| candidate.as_slice().cmp(word))
            .is_ok()
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a LetterString;
    type IntoIter = Iter<'a, LetterString>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
