use thiserror::Error;

/// Malformed puzzle or dictionary input.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("given word must be exactly 5 letters: {0:?}")]
    BadGivenWord(String),

    #[error("letter group must be 3 or 4 letters: {0:?}")]
    BadLetterGroup(String),

    #[error("dictionary word must be exactly 5 letters: {0:?}")]
    BadDictionaryWord(String),

    #[error("line {0} is neither a board row nor a letter group: {1:?}")]
    UnclassifiableLine(usize, String),

    #[error("board row {0} does not match the width of the first row")]
    UnevenBoard(usize),

    #[error("puzzle has no board rows")]
    EmptyBoard,
}

/// A structural puzzle defect detectable before solving.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ModelError {
    #[error("board group {label:?} has {size} cells; expected 3, 4, or a straight 5-cell run")]
    BadGroupSize { label: char, size: usize },

    #[error("{letter_groups} letter group(s) of size {size}, but {board_groups} board group(s)")]
    GroupCountMismatch {
        size: usize,
        letter_groups: usize,
        board_groups: usize,
    },

    #[error("board has no 5-cell word slot to hold the given word")]
    NoWordSlot,
}

/// Any failure while loading, modelling, or solving a puzzle.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Reported by the solver: no assignment satisfies the constraints.
    #[error("no assignment satisfies the puzzle constraints")]
    Infeasible,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
