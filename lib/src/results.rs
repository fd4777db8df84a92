use std::io;
use thiserror::Error;

/// Indicates that an error occurred while compiling, loading, or querying a GADDAG.
#[derive(Error, Debug)]
pub enum GaddagError {
    /// Reading or writing the underlying file or stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The structure ended before its header or root record was complete.
    #[error("structure is truncated: expected at least {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    /// The version byte does not match a layout this library knows how to read.
    #[error("unsupported structure version {0}")]
    UnsupportedVersion(u8),
    /// The header fields are inconsistent with each other.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// Indicates that the given character is not in the supported alphabet.
    #[error("unsupported character {0:?}")]
    UnsupportedCharacter(char),
    /// Indicates that a word is longer than the supported maximum length, which is given.
    #[error("word is longer than the maximum of {0} letters")]
    WordLength(usize),
}

pub type Result<T> = std::result::Result<T, GaddagError>;
