//! Puzzle entities and the raw text loader.
//!
//! A puzzle file starts with the given word, followed by board rows
//! (digits and letters label the coloured groups, `.` marks an empty
//! cell) and letter-group rows (letters only), in any order.

use std::collections::BTreeSet;

use crate::error::ParseError;
use crate::solver::Val;

/// The number of letters in the alphabet.
pub const NUM_LETTERS: usize = 26;

/// The length of every word slot and dictionary word.
pub const WORD_LEN: usize = 5;

/// A board coordinate, `(row, col)`.
pub type CellPos = (usize, usize);

/// Convert an uppercase ASCII letter to its value: A=0, B=1, ...
pub fn letter_index(c: char) -> Val {
    debug_assert!(c.is_ascii_uppercase());
    (c as u8 - b'A') as Val
}

/// Convert a letter value back to its character: 0=A, 1=B, ...
pub fn letter_char(val: Val) -> char {
    debug_assert!((0..NUM_LETTERS as Val).contains(&val));
    (b'A' + val as u8) as char
}

/// An ordered multiset of letters supplied as one tile set.  It must be
/// placed, as a unit, into exactly one board group of matching size.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LetterGroup {
    letters: Vec<Val>,
}

impl LetterGroup {
    fn parse(line: &str) -> Result<Self, ParseError> {
        if !matches!(line.len(), 3 | 4) {
            return Err(ParseError::BadLetterGroup(line.to_string()));
        }

        Ok(LetterGroup {
            letters: line.chars().map(letter_index).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// The tiles in input order.
    pub fn letters(&self) -> &[Val] {
        &self.letters
    }

    /// How many tiles of the group carry the given letter.
    pub fn count_of(&self, letter: Val) -> Val {
        self.letters.iter().filter(|&&l| l == letter).count() as Val
    }

    /// The distinct letters of the group, in ascending order.
    pub fn distinct(&self) -> impl Iterator<Item = Val> + '_ {
        self.letters
            .iter()
            .copied()
            .collect::<BTreeSet<Val>>()
            .into_iter()
    }
}

/// The rectangular grid of board label characters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    labels: Vec<Vec<char>>,
}

impl Board {
    pub fn num_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn num_cols(&self) -> usize {
        self.labels.first().map_or(0, Vec::len)
    }

    /// The label character at a cell (`.` for empty cells).
    pub fn label(&self, (row, col): CellPos) -> char {
        self.labels[row][col]
    }

    /// A coloured cell carries a letter in the solution; a `.` cell
    /// stays blank.
    pub fn is_colored(&self, pos: CellPos) -> bool {
        self.label(pos) != '.'
    }

    /// All cells in row-major (first-encounter) order.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let cols = self.num_cols();
        (0..self.num_rows()).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

/// A set of board cells sharing one label, to be filled as one
/// tile-placement unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoardGroup {
    pub label: char,
    pub cells: Vec<CellPos>,
}

/// A 5-cell row or column run that must spell a dictionary word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordSlot {
    pub cells: [CellPos; WORD_LEN],
}

/// A parsed puzzle: the given word, the board template, and the tile
/// sets.  Constructed once by the loader and never mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Puzzle {
    pub given: [Val; WORD_LEN],
    pub board: Board,
    pub letter_groups: Vec<LetterGroup>,
}

impl Puzzle {
    /// Parse raw puzzle text.  Case insensitive.
    ///
    /// Line 1 is the given word.  Every later non-empty line is a
    /// board row if it contains a digit or a `.`, otherwise a letter
    /// group if it contains only letters.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text.lines().map(|line| line.trim().to_uppercase());

        let given_line = lines.next().unwrap_or_default();
        let given = parse_given(&given_line)?;

        let mut rows: Vec<Vec<char>> = Vec::new();
        let mut letter_groups = Vec::new();

        for (num, line) in lines.enumerate() {
            if line.is_empty() {
                continue;
            }

            if line.chars().any(|c| c.is_ascii_digit() || c == '.') {
                if !line.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
                    return Err(ParseError::UnclassifiableLine(num + 2, line));
                }
                if !rows.is_empty() && line.len() != rows[0].len() {
                    return Err(ParseError::UnevenBoard(rows.len()));
                }
                rows.push(line.chars().collect());
            } else if line.chars().all(|c| c.is_ascii_alphabetic()) {
                letter_groups.push(LetterGroup::parse(&line)?);
            } else {
                return Err(ParseError::UnclassifiableLine(num + 2, line));
            }
        }

        if rows.is_empty() {
            return Err(ParseError::EmptyBoard);
        }

        Ok(Puzzle {
            given,
            board: Board { labels: rows },
            letter_groups,
        })
    }

    /// The union of letters across all letter groups of the given size.
    pub fn letter_pool_of_size(&self, size: usize) -> BTreeSet<Val> {
        self.letter_groups
            .iter()
            .filter(|lg| lg.len() == size)
            .flat_map(|lg| lg.letters().iter().copied())
            .collect()
    }

    /// The union of letters across all letter groups.
    pub fn letter_pool(&self) -> BTreeSet<Val> {
        self.letter_groups
            .iter()
            .flat_map(|lg| lg.letters().iter().copied())
            .collect()
    }
}

fn parse_given(line: &str) -> Result<[Val; WORD_LEN], ParseError> {
    if line.len() != WORD_LEN || !line.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ParseError::BadGivenWord(line.to_string()));
    }

    let letters: Vec<Val> = line.chars().map(letter_index).collect();
    Ok(letters.try_into().expect("word length"))
}

#[cfg(test)]
mod tests {
    use super::{letter_char, letter_index, ParseError, Puzzle};

    #[test]
    fn letter_round_trip() {
        assert_eq!(letter_index('A'), 0);
        assert_eq!(letter_index('Z'), 25);
        assert_eq!(letter_char(0), 'A');
        assert_eq!(letter_char(25), 'Z');
    }

    #[test]
    fn parse_classifies_lines() {
        let puzzle = Puzzle::parse("hello\n11122\n2....\nhel\nlost\n").expect("parse");
        assert_eq!(puzzle.given, [7, 4, 11, 11, 14]);
        assert_eq!(puzzle.board.num_rows(), 2);
        assert_eq!(puzzle.board.num_cols(), 5);
        assert_eq!(puzzle.letter_groups.len(), 2);
        assert_eq!(puzzle.letter_groups[0].len(), 3);
        assert_eq!(puzzle.letter_groups[1].len(), 4);
    }

    #[test]
    fn parse_is_case_insensitive() {
        let a = Puzzle::parse("HELLO\n11122\nHEL\n").expect("parse");
        let b = Puzzle::parse("hello\n11122\nhel\n").expect("parse");
        assert_eq!(a, b);
    }

    #[test]
    fn board_row_may_carry_letter_labels() {
        let puzzle = Puzzle::parse("hello\nAA.11\n").expect("parse");
        assert_eq!(puzzle.board.label((0, 0)), 'A');
        assert!(puzzle.board.is_colored((0, 1)));
        assert!(!puzzle.board.is_colored((0, 2)));
    }

    #[test]
    fn rejects_short_given_word() {
        let err = Puzzle::parse("cat\n123\n").unwrap_err();
        assert_eq!(err, ParseError::BadGivenWord("CAT".into()));
    }

    #[test]
    fn rejects_uneven_board() {
        let err = Puzzle::parse("hello\n111\n22\n").unwrap_err();
        assert_eq!(err, ParseError::UnevenBoard(1));
    }

    #[test]
    fn rejects_unclassifiable_line() {
        let err = Puzzle::parse("hello\n111\nc-t\n").unwrap_err();
        assert!(matches!(err, ParseError::UnclassifiableLine(3, _)));
    }

    #[test]
    fn rejects_letter_group_of_wrong_size() {
        let err = Puzzle::parse("hello\n111\nmouse\n").unwrap_err();
        assert_eq!(err, ParseError::BadLetterGroup("MOUSE".into()));
    }

    #[test]
    fn rejects_missing_board() {
        let err = Puzzle::parse("hello\ncat\n").unwrap_err();
        assert_eq!(err, ParseError::EmptyBoard);
    }

    #[test]
    fn letter_pools() {
        let puzzle = Puzzle::parse("hello\n11122\nhel\nlost\n").expect("parse");
        let threes = puzzle.letter_pool_of_size(3);
        assert!(threes.contains(&letter_index('H')));
        assert!(!threes.contains(&letter_index('S')));
        assert_eq!(puzzle.letter_pool().len(), 6);
    }

    #[test]
    fn count_of_repeated_letters() {
        let puzzle = Puzzle::parse("hello\n111\nbee\n").expect("parse");
        let group = &puzzle.letter_groups[0];
        assert_eq!(group.count_of(super::letter_index('E')), 2);
        assert_eq!(group.count_of(super::letter_index('B')), 1);
        assert_eq!(group.distinct().count(), 2);
    }
}
