use crate::fixed::MAX_LETTERS;
use crate::letters::*;
use crate::results::*;
use crate::search::Rack;
use rand::seq::SliceRandom;
use rand::Rng;

/// The standard 100-tile English distribution, including two blanks.
const STANDARD_TILES: &str = "??AAAAAAAAABBCCDDDDEEEEEEEEEEEEFFGGGHHIIIIIIIIIJKLLLLMMNNNNNNOOOOOOOOPPQRRRRRRSSSSTTTTTTUUUUVVWWXYYZ";

/// A multiset of tiles that racks are drawn from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TileBag {
    tiles: Vec<Letter>,
}

impl TileBag {
    /// Creates a bag with the standard English tile distribution.
    pub fn standard() -> TileBag {
        TileBag {
            tiles: STANDARD_TILES
                .bytes()
                .map(|tile| match tile {
                    b'?' => BLANK,
                    letter => FIRST_LETTER + (letter - b'A'),
                })
                .collect(),
        }
    }

    /// Creates a bag from text such as `"??AAB"`, where `?` is a blank.
    pub fn from_tiles(tiles: &str) -> Result<TileBag> {
        Ok(TileBag {
            tiles: tiles.chars().map(encode_letter).collect::<Result<Vec<Letter>>>()?,
        })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns how many of the given tile are in the bag.
    pub fn count(&self, letter: Letter) -> usize {
        self.tiles.iter().filter(|tile| **tile == letter).count()
    }

    /// Draws `size` tiles without replacement. Blanks in the bag may be drawn.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds [`MAX_LETTERS`] or the number of tiles in the bag.
    pub fn random_rack<R: Rng + ?Sized>(&self, rng: &mut R, size: usize) -> Rack {
        assert!(size <= MAX_LETTERS && size <= self.tiles.len());
        let drawn: Vec<Letter> = self.tiles.choose_multiple(rng, size).copied().collect();
        Rack::from_letters(&drawn)
    }

    /// Draws a rack of `size` tiles with exactly `blanks` blanks. The concrete tiles are drawn
    /// without replacement from the bag's non-blank tiles.
    ///
    /// # Panics
    ///
    /// Panics if `blanks` exceeds `size`, `size` exceeds [`MAX_LETTERS`], or the bag does not
    /// have enough concrete tiles.
    pub fn blank_rack<R: Rng + ?Sized>(&self, rng: &mut R, blanks: usize, size: usize) -> Rack {
        assert!(blanks <= size && size <= MAX_LETTERS);
        let concrete: Vec<Letter> = self
            .tiles
            .iter()
            .copied()
            .filter(|tile| *tile != BLANK)
            .collect();
        assert!(size - blanks <= concrete.len());
        let drawn: Vec<Letter> = concrete
            .choose_multiple(rng, size - blanks)
            .copied()
            .collect();
        Rack::from_letters(&drawn).with_blanks(blanks as u8)
    }
}

impl Default for TileBag {
    fn default() -> Self {
        TileBag::standard()
    }
}
