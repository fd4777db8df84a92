#[macro_use]
extern crate assert_matches;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rs_gaddag::*;

use std::fs::File;
use std::io;
use std::result::Result;

fn sample_gaddag() -> Result<Gaddag, GaddagError> {
    let words_reader = io::BufReader::new(File::open("../data/sample-words-shuffled.txt")?);
    Gaddag::from_bytes(build_gaddag(&WordList::from_reader(words_reader)?))
}

#[test]
fn tile_bag_from_tiles() -> Result<(), GaddagError> {
    let bag = TileBag::from_tiles("aab??")?;

    assert_eq!(bag.len(), 5);
    assert_eq!(bag.count(BLANK), 2);
    assert_eq!(bag.count(encode_letter('A')?), 2);
    assert_matches!(
        TileBag::from_tiles("ab-"),
        Err(GaddagError::UnsupportedCharacter('-'))
    );
    Ok(())
}

#[test]
fn random_racks_come_from_the_bag() {
    let bag = TileBag::standard();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let rack = bag.random_rack(&mut rng, 7);
        assert_eq!(rack.len(), 7);
        assert!(rack.blanks() <= 2);
        for letter in FIRST_LETTER..=LAST_LETTER {
            assert!(rack.count(letter) as usize <= bag.count(letter));
        }
    }
}

#[test]
fn puzzles_have_few_answers() -> Result<(), GaddagError> {
    let gaddag = sample_gaddag()?;
    let options = PuzzleOptions {
        count: 5,
        blanks: 1,
        size: 4,
        max_answers: 3,
        ..PuzzleOptions::default()
    };

    let puzzles = blank_puzzles(
        &gaddag,
        &TileBag::standard(),
        &mut StdRng::seed_from_u64(2024),
        options,
    );

    assert_eq!(puzzles.len(), 5);
    for puzzle in &puzzles {
        assert_eq!(puzzle.rack.blanks(), 1);
        assert_eq!(puzzle.rack.len(), 4);
        assert!((1..=3).contains(&puzzle.answers.len()));
        assert_eq!(
            puzzle.answers,
            find_words(&gaddag, &puzzle.rack, SearchMode::UseAll)
        );
    }
    Ok(())
}

#[test]
fn puzzles_repeat_for_a_seed() -> Result<(), GaddagError> {
    let gaddag = sample_gaddag()?;
    let options = PuzzleOptions {
        count: 3,
        size: 5,
        ..PuzzleOptions::default()
    };

    let first = blank_puzzles(
        &gaddag,
        &TileBag::standard(),
        &mut StdRng::seed_from_u64(5),
        options,
    );
    let second = blank_puzzles(
        &gaddag,
        &TileBag::standard(),
        &mut StdRng::seed_from_u64(5),
        options,
    );

    assert_eq!(first, second);
    Ok(())
}
