use crate::bag::TileBag;
use crate::fixed::LetterString;
use crate::index::Gaddag;
use crate::search::{find_words_batch, Rack, SearchMode};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// A rack together with every word that uses all of its tiles.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Puzzle {
    pub rack: Rack,
    pub answers: BTreeSet<LetterString>,
}

/// Controls which racks [`blank_puzzles`] keeps.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PuzzleOptions {
    /// How many puzzles to generate.
    pub count: usize,
    /// Blanks on every rack.
    pub blanks: usize,
    /// Tiles on every rack, blanks included.
    pub size: usize,
    /// Racks with more answers than this are discarded.
    pub max_answers: usize,
    /// Give up after drawing this many racks.
    pub max_attempts: usize,
    /// Racks searched in parallel per round.
    pub batch_size: usize,
}

impl Default for PuzzleOptions {
    fn default() -> Self {
        PuzzleOptions {
            count: 10,
            blanks: 1,
            size: 7,
            max_answers: 5,
            max_attempts: 10_000,
            batch_size: 64,
        }
    }
}

/// Draws racks with blanks and keeps those that have between one and `max_answers` words using
/// every tile.
///
/// Returns fewer than `count` puzzles if `max_attempts` racks were drawn first. For a fixed
/// random seed the output is deterministic.
pub fn blank_puzzles<R: Rng + ?Sized>(
    gaddag: &Gaddag,
    bag: &TileBag,
    rng: &mut R,
    options: PuzzleOptions,
) -> Vec<Puzzle> {
    let mut puzzles = Vec::with_capacity(options.count);
    let mut attempts = 0;
    while puzzles.len() < options.count && attempts < options.max_attempts {
        let batch = options
            .batch_size
            .max(1)
            .min(options.max_attempts - attempts);
        let racks: Vec<Rack> = (0..batch)
            .map(|_| bag.blank_rack(rng, options.blanks, options.size))
            .collect();
        attempts += batch;
        let all_answers = find_words_batch(gaddag, &racks, SearchMode::UseAll);
        for (rack, answers) in racks.into_iter().zip(all_answers) {
            if puzzles.len() == options.count {
                break;
            }
            if (1..=options.max_answers).contains(&answers.len()) {
                puzzles.push(Puzzle { rack, answers });
            }
        }
    }
    debug!(puzzles = puzzles.len(), attempts, "generated blank puzzles");
    puzzles
}
