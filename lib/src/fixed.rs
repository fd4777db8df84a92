use crate::letters::{decode_word, encode_word, Letter};
use crate::results::*;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// The most letters a [`LetterString`] can hold.
///
/// This leaves room for a word of [`MAX_WORD_LENGTH`] letters plus the direction-switch
/// delimiter that GADDAG patterns carry.
pub const MAX_LETTERS: usize = 17;

/// The longest word that can be compiled into a GADDAG or formed from a rack.
pub const MAX_WORD_LENGTH: usize = MAX_LETTERS - 1;

/// A stack-allocated sequence of letter codes that never grows beyond [`MAX_LETTERS`].
///
/// Exceeding the capacity is a contract violation and panics, so that hot paths never allocate.
#[derive(Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct LetterString {
    letters: [Letter; MAX_LETTERS],
    len: u8,
}

impl LetterString {
    /// Creates an empty string.
    pub const fn new() -> LetterString {
        LetterString {
            letters: [0; MAX_LETTERS],
            len: 0,
        }
    }

    /// Copies the given letters, or fails if there are more than [`MAX_LETTERS`] of them.
    pub fn try_from_slice(letters: &[Letter]) -> Result<LetterString> {
        if letters.len() > MAX_LETTERS {
            return Err(GaddagError::WordLength(MAX_LETTERS));
        }
        let mut string = LetterString::new();
        string.extend_from_slice(letters);
        Ok(string)
    }

    /// Copies letters that are already known to fit.
    ///
    /// # Panics
    ///
    /// Panics if there are more than [`MAX_LETTERS`] letters.
    pub fn from_word(word: &[Letter]) -> LetterString {
        let mut string = LetterString::new();
        string.extend_from_slice(word);
        string
    }

    /// Appends a letter.
    ///
    /// # Panics
    ///
    /// Panics if the string is already full.
    #[inline]
    pub fn push(&mut self, letter: Letter) {
        assert!(
            (self.len as usize) < MAX_LETTERS,
            "LetterString capacity of {} exceeded",
            MAX_LETTERS
        );
        self.letters[self.len as usize] = letter;
        self.len += 1;
    }

    /// Removes and returns the last letter.
    #[inline]
    pub fn pop(&mut self) -> Option<Letter> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.letters[self.len as usize])
    }

    /// Appends all the given letters.
    ///
    /// # Panics
    ///
    /// Panics if the result would not fit.
    pub fn extend_from_slice(&mut self, letters: &[Letter]) {
        assert!(
            self.len as usize + letters.len() <= MAX_LETTERS,
            "LetterString capacity of {} exceeded",
            MAX_LETTERS
        );
        let start = self.len as usize;
        self.letters[start..start + letters.len()].copy_from_slice(letters);
        self.len += letters.len() as u8;
    }

    /// Returns a copy of this string with the letters in reverse order.
    pub fn reversed(&self) -> LetterString {
        let mut reversed = *self;
        reversed.letters[..self.len as usize].reverse();
        reversed
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Letter] {
        &self.letters[..self.len as usize]
    }

    pub fn is_full(&self) -> bool {
        self.len as usize == MAX_LETTERS
    }
}

impl Default for LetterString {
    fn default() -> Self {
        LetterString::new()
    }
}

impl Deref for LetterString {
    type Target = [Letter];

    fn deref(&self) -> &[Letter] {
        self.as_slice()
    }
}

impl AsRef<[Letter]> for LetterString {
    fn as_ref(&self) -> &[Letter] {
        self.as_slice()
    }
}

// Only the live prefix takes part in comparisons; bytes past `len` are stale.
impl PartialEq for LetterString {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for LetterString {}

impl PartialOrd for LetterString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LetterString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl Hash for LetterString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Debug for LetterString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LetterString({:?})", decode_word(self))
    }
}

impl fmt::Display for LetterString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&decode_word(self))
    }
}

impl TryFrom<&str> for LetterString {
    type Error = GaddagError;

    fn try_from(word: &str) -> Result<Self> {
        encode_word(word)
    }
}

impl TryFrom<String> for LetterString {
    type Error = GaddagError;

    fn try_from(word: String) -> Result<Self> {
        encode_word(&word)
    }
}

impl From<LetterString> for String {
    fn from(string: LetterString) -> String {
        decode_word(&string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn push_and_pop() {
        let mut string = LetterString::new();
        string.push(3);
        string.push(1);

        assert_eq!(string.as_slice(), &[3, 1]);
        assert_eq!(string.pop(), Some(1));
        assert_eq!(string.pop(), Some(3));
        assert_eq!(string.pop(), None);
        assert!(string.is_empty());
    }

    #[test]
    fn equality_ignores_stale_letters() {
        let mut a = LetterString::try_from_slice(&[1, 2, 3]).unwrap();
        a.pop();
        let b = LetterString::try_from_slice(&[1, 2]).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn orders_like_slices() {
        let short = LetterString::try_from_slice(&[1, 2]).unwrap();
        let long = LetterString::try_from_slice(&[1, 2, 1]).unwrap();
        let later = LetterString::try_from_slice(&[2]).unwrap();

        assert!(short < long);
        assert!(long < later);
    }

    #[test]
    fn reversed() {
        let string = LetterString::try_from_slice(&[1, 2, 3]).unwrap();

        assert_eq!(string.reversed().as_slice(), &[3, 2, 1]);
    }

    #[test]
    fn try_from_slice_too_long() {
        assert_matches!(
            LetterString::try_from_slice(&[1; MAX_LETTERS + 1]),
            Err(GaddagError::WordLength(MAX_LETTERS))
        );
        assert_matches!(LetterString::try_from_slice(&[1; MAX_LETTERS]), Ok(s) if s.is_full());
    }

    #[test]
    #[should_panic]
    fn push_past_capacity_panics() {
        let mut string = LetterString::try_from_slice(&[1; MAX_LETTERS]).unwrap();
        string.push(1);
    }
}
