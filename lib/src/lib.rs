//! Compiles word lists into compact, minimized GADDAG (or DAWG) byte images and searches them
//! for words that can be formed from a rack of tiles, blanks included.
//!
//! ```
//! use rs_gaddag::*;
//!
//! let words = WordList::from_iterator(["cat", "act", "cats"]);
//! let gaddag = Gaddag::from_bytes(build_gaddag(&words)).unwrap();
//!
//! let rack: Rack = "tac".parse().unwrap();
//! let found: Vec<String> = find_words(&gaddag, &rack, SearchMode::UseAll)
//!     .into_iter()
//!     .map(String::from)
//!     .collect();
//! assert_eq!(found, vec!["ACT", "CAT"]);
//! ```

mod bag;
mod builder;
mod data;
mod fixed;
mod index;
mod letters;
mod puzzles;
mod results;
mod search;

pub use bag::TileBag;
pub use builder::*;
pub use data::WordList;
pub use fixed::*;
pub use index::*;
pub use letters::*;
pub use puzzles::*;
pub use results::*;
pub use search::*;
