use crate::fixed::{LetterString, MAX_LETTERS};
use crate::index::{Edge, Gaddag, Node};
use crate::letters::*;
use crate::results::*;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The tiles available for forming words: a count per letter, plus a count of blanks.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rack {
    /// Indexed by letter code; index `BLANK` holds the number of blanks.
    counts: [u8; ALPHABET_SIZE],
}

impl Rack {
    /// Creates a rack holding the given tiles, where `BLANK` is a blank tile.
    ///
    /// # Panics
    ///
    /// Panics if there are more than [`MAX_LETTERS`] tiles or a code is past `LAST_LETTER`.
    pub fn from_letters(letters: &[Letter]) -> Rack {
        assert!(
            letters.len() <= MAX_LETTERS,
            "rack of {} tiles exceeds the maximum of {}",
            letters.len(),
            MAX_LETTERS
        );
        let mut rack = Rack::default();
        for &letter in letters {
            assert!(letter <= LAST_LETTER, "letter code {} is not in the alphabet", letter);
            rack.counts[letter as usize] += 1;
        }
        rack
    }

    /// Returns a copy of this rack with `blanks` blank tiles.
    ///
    /// # Panics
    ///
    /// Panics if the rack would hold more than [`MAX_LETTERS`] tiles.
    pub fn with_blanks(mut self, blanks: u8) -> Rack {
        self.counts[BLANK as usize] = blanks;
        assert!(
            self.len() <= MAX_LETTERS,
            "rack of {} tiles exceeds the maximum of {}",
            self.len(),
            MAX_LETTERS
        );
        self
    }

    pub fn blanks(&self) -> u8 {
        self.counts[BLANK as usize]
    }

    /// Returns how many tiles of the given concrete letter are on the rack.
    pub fn count(&self, letter: Letter) -> u8 {
        self.counts[letter as usize]
    }

    /// Returns the total number of tiles, blanks included.
    pub fn len(&self) -> usize {
        self.counts.iter().map(|count| *count as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a bitmask of the concrete letters with a nonzero count.
    pub fn concrete_bits(&self) -> u64 {
        (FIRST_LETTER..=LAST_LETTER)
            .filter(|letter| self.counts[*letter as usize] > 0)
            .fold(0, |bits, letter| bits | (1 << letter))
    }

    /// Returns the tiles in ascending letter order, blanks first.
    pub fn letters(&self) -> LetterString {
        let mut letters = LetterString::new();
        for (letter, count) in self.counts.iter().enumerate() {
            for _ in 0..*count {
                letters.push(letter as Letter);
            }
        }
        letters
    }
}

impl FromStr for Rack {
    type Err = GaddagError;

    /// Parses a rack such as `"CAT?"`, where `?` is a blank.
    fn from_str(text: &str) -> Result<Rack> {
        let mut letters = LetterString::new();
        for c in text.chars() {
            if letters.is_full() {
                return Err(GaddagError::WordLength(MAX_LETTERS));
            }
            letters.push(encode_letter(c)?);
        }
        Ok(Rack::from_letters(&letters))
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&decode_word(&self.letters()))
    }
}

/// Which words a search accepts.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SearchMode {
    /// Only words that use every tile on the rack, blanks included.
    UseAll,
    /// Any word that can be formed from some of the tiles.
    Subset,
}

/// Finds every word in the GADDAG that can be formed from the rack.
pub fn find_words(gaddag: &Gaddag, rack: &Rack, mode: SearchMode) -> BTreeSet<LetterString> {
    RackSearch::new(gaddag, rack, mode, true).run()
}

/// Finds every word in a DAWG (a structure built with `Layout::Dawg`) that can be formed from
/// the rack.
pub fn find_words_forward(
    dawg: &Gaddag,
    rack: &Rack,
    mode: SearchMode,
) -> BTreeSet<LetterString> {
    RackSearch::new(dawg, rack, mode, false).run()
}

/// Runs [`find_words`] for each rack in parallel. Results are in the same order as the racks.
pub fn find_words_batch(
    gaddag: &Gaddag,
    racks: &[Rack],
    mode: SearchMode,
) -> Vec<BTreeSet<LetterString>> {
    racks
        .par_iter()
        .map(|rack| find_words(gaddag, rack, mode))
        .collect()
}

/// The mutable state of one search. Every change made before recursing is undone after it.
struct RackSearch<'a> {
    gaddag: &'a Gaddag,
    /// Remaining tiles; index `BLANK` holds the remaining blanks.
    counts: [u8; ALPHABET_SIZE],
    /// Letters with a nonzero remaining concrete count.
    rack_bits: u64,
    must_use_all: bool,
    /// Whether to switch to the forward suffix after the first letter.
    pivot: bool,
    prefix: LetterString,
    results: BTreeSet<LetterString>,
}

impl<'a> RackSearch<'a> {
    fn new(gaddag: &'a Gaddag, rack: &Rack, mode: SearchMode, pivot: bool) -> RackSearch<'a> {
        RackSearch {
            gaddag,
            counts: rack.counts,
            rack_bits: rack.concrete_bits(),
            must_use_all: mode == SearchMode::UseAll,
            pivot,
            prefix: LetterString::new(),
            results: BTreeSet::new(),
        }
    }

    fn run(mut self) -> BTreeSet<LetterString> {
        let blank_letters = all_letter_bits(self.gaddag.last_letter());
        self.search(self.gaddag.root(), blank_letters);
        self.results
    }

    /// Extends the prefix with every letter the node has a child for and the rack can supply.
    ///
    /// `blank_letters` holds the letters a blank may still stand for on this path: a letter is
    /// removed once its last concrete tile is placed, so that blank copies of a letter always
    /// come before concrete ones and each word is reached through fewer assignments.
    fn search(&mut self, node: Node, blank_letters: u64) {
        let node = if self.pivot && self.prefix.len() == 1 {
            let suffix = self
                .gaddag
                .change_direction(node)
                .and_then(|edge| self.gaddag.follow(edge));
            match suffix {
                Some(suffix) => suffix,
                None => return,
            }
        } else {
            node
        };
        if self.blanks() == 0 && !self.gaddag.has_any_child(node, self.rack_bits) {
            return;
        }

        let mut min_letter = FIRST_LETTER;
        loop {
            let (letter, edge) = if self.blanks() > 0 {
                let Some((letter, edge)) =
                    self.gaddag.next_rack_child(node, min_letter, blank_letters)
                else {
                    return;
                };
                self.counts[BLANK as usize] -= 1;
                self.place(letter, edge, blank_letters);
                self.counts[BLANK as usize] += 1;
                (letter, edge)
            } else {
                match self.gaddag.next_rack_child(node, min_letter, self.rack_bits) {
                    Some(found) => found,
                    None => return,
                }
            };

            if self.counts[letter as usize] > 0 {
                let saved_rack_bits = self.rack_bits;
                let mut child_blank_letters = blank_letters;
                self.counts[letter as usize] -= 1;
                if self.counts[letter as usize] == 0 {
                    self.rack_bits &= !(1 << letter);
                    child_blank_letters &= !(1 << letter);
                }
                self.place(letter, edge, child_blank_letters);
                self.counts[letter as usize] += 1;
                self.rack_bits = saved_rack_bits;
            }
            min_letter = letter + 1;
        }
    }

    /// Pushes the letter, records a word if the edge completes one, and descends.
    fn place(&mut self, letter: Letter, edge: Edge, blank_letters: u64) {
        self.prefix.push(letter);
        if self.gaddag.completes_word(edge) && (!self.must_use_all || self.rack_used_up()) {
            self.results.insert(self.prefix);
        }
        if let Some(child) = self.gaddag.follow(edge) {
            self.search(child, blank_letters);
        }
        self.prefix.pop();
    }

    #[inline]
    fn blanks(&self) -> u8 {
        self.counts[BLANK as usize]
    }

    fn rack_used_up(&self) -> bool {
        self.rack_bits == 0 && self.blanks() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_gaddag;
    use crate::data::WordList;
    use assert_matches::assert_matches;

    fn gaddag_of(words: &[&str]) -> Gaddag {
        Gaddag::from_bytes(build_gaddag(&WordList::from_iterator(words))).unwrap()
    }

    fn decoded(words: BTreeSet<LetterString>) -> Vec<String> {
        words.iter().map(|word| decode_word(word)).collect()
    }

    #[test]
    fn rack_from_str() {
        let rack: Rack = "cAt??".parse().unwrap();

        assert_eq!(rack.blanks(), 2);
        assert_eq!(rack.count(1), 1);
        assert_eq!(rack.count(3), 1);
        assert_eq!(rack.count(20), 1);
        assert_eq!(rack.len(), 5);
        assert_eq!(rack.concrete_bits(), (1 << 1) | (1 << 3) | (1 << 20));
        assert_eq!(rack.to_string(), "??ACT");
    }

    #[test]
    fn rack_from_str_errors() {
        assert_matches!(
            "ca7".parse::<Rack>(),
            Err(GaddagError::UnsupportedCharacter('7'))
        );
        assert_matches!(
            "abcdefghijklmnopqr".parse::<Rack>(),
            Err(GaddagError::WordLength(MAX_LETTERS))
        );
    }

    #[test]
    #[should_panic]
    fn rack_with_too_many_blanks_panics() {
        Rack::from_letters(&[1; MAX_LETTERS]).with_blanks(1);
    }

    #[test]
    fn use_all_concrete() {
        let gaddag = gaddag_of(&["cat", "cats", "act"]);
        let rack: Rack = "cat".parse().unwrap();

        assert_eq!(
            decoded(find_words(&gaddag, &rack, SearchMode::UseAll)),
            vec!["ACT", "CAT"]
        );
    }

    #[test]
    fn use_all_with_blank() {
        let gaddag = gaddag_of(&["cat", "cats", "act"]);
        let rack: Rack = "cat?".parse().unwrap();

        assert_eq!(
            decoded(find_words(&gaddag, &rack, SearchMode::UseAll)),
            vec!["CATS"]
        );
    }

    #[test]
    fn subset_without_blank() {
        let gaddag = gaddag_of(&["cat", "cats", "act", "at", "ta"]);
        let rack: Rack = "cat".parse().unwrap();

        assert_eq!(
            decoded(find_words(&gaddag, &rack, SearchMode::Subset)),
            vec!["ACT", "AT", "CAT", "TA"]
        );
    }

    #[test]
    fn blank_stands_for_a_repeated_letter() {
        let gaddag = gaddag_of(&["aa", "a"]);
        let rack: Rack = "a?".parse().unwrap();

        assert_eq!(
            decoded(find_words(&gaddag, &rack, SearchMode::UseAll)),
            vec!["AA"]
        );
        assert_eq!(
            decoded(find_words(&gaddag, &rack, SearchMode::Subset)),
            vec!["A", "AA"]
        );
    }

    #[test]
    fn only_blanks() {
        let gaddag = gaddag_of(&["ab", "ba", "abc"]);
        let rack = Rack::default().with_blanks(2);

        assert_eq!(
            decoded(find_words(&gaddag, &rack, SearchMode::UseAll)),
            vec!["AB", "BA"]
        );
    }

    #[test]
    fn empty_rack_finds_nothing() {
        let gaddag = gaddag_of(&["a", "cat"]);

        assert!(find_words(&gaddag, &Rack::default(), SearchMode::Subset).is_empty());
    }

    #[test]
    fn empty_gaddag_finds_nothing() {
        let gaddag = gaddag_of(&[]);
        let rack: Rack = "cat?".parse().unwrap();

        assert!(gaddag.is_empty());
        assert!(find_words(&gaddag, &rack, SearchMode::Subset).is_empty());
    }
}
