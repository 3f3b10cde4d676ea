use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error reported when encoding, decoding, writing or reshaping a scale table fails.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("could not encode or decode scale table: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("could not access `{}`: {source}", .path.display())]
    Filesystem { path: PathBuf, source: io::Error },

    /// A column does not have one entry per row of its table.
    #[error("column `{column}` has {actual} rows but the table has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("column `{column}` is not an {expected} column")]
    ColumnKind {
        column: String,
        expected: &'static str,
    },
}

impl TableError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| TableError::Filesystem { path, source }
    }
}

/// Error reported when building a [`ScaleType`](crate::scale::ScaleType) fails.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ScaleTypeError {
    #[error("the scale type has no intervals")]
    Empty,

    #[error("the first interval must be 0 (the root)")]
    MissingRoot,

    #[error("intervals must be strictly ascending")]
    NotAscending,

    #[error("intervals must be smaller than 12 semitones")]
    OutOfOctave,
}

/// Error reported when parsing a [`Key`](crate::key::Key) name fails.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum KeyParseError {
    #[error("key name is empty")]
    Empty,

    #[error("`{0}` is not a note letter (expected A-G)")]
    UnknownLetter(char),

    #[error("`{0}` is not an accidental (expected #, b, x, ♯, ♭, 𝄪 or 𝄫)")]
    UnknownAccidental(char),

    #[error("`{0}` mixes sharps and flats")]
    MixedAccidentals(String),

    #[error("`{0}` has more than 255 sharps or flats")]
    TooManyAccidentals(String),
}
