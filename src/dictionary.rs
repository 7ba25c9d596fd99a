//! The 5-letter word list and its letter-pool filter.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::error::{Error, ParseError};
use crate::puzzle::{letter_index, WORD_LEN};
use crate::solver::Val;

/// The set of words allowed in the board's word slots.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dictionary {
    words: Vec<[Val; WORD_LEN]>,
}

impl Dictionary {
    /// Parse dictionary text: one 5-letter word per line, case
    /// insensitive.  Blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut words = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let word = line.to_uppercase();
            if word.len() != WORD_LEN || !word.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ParseError::BadDictionaryWord(word));
            }

            let letters: Vec<Val> = word.chars().map(letter_index).collect();
            words.push(letters.try_into().expect("word length"));
        }

        Ok(Dictionary { words })
    }

    /// Load a dictionary from a file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text)?)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &[Val]) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn words(&self) -> impl Iterator<Item = &[Val; WORD_LEN]> {
        self.words.iter()
    }

    /// Keep only the words whose every letter is drawn from `pool`.
    ///
    /// A word outside the pool could never be placed anyway; dropping
    /// it up front shrinks the word-slot tables.
    pub fn restrict_to(&self, pool: &BTreeSet<Val>) -> Dictionary {
        Dictionary {
            words: self
                .words
                .iter()
                .filter(|word| word.iter().all(|letter| pool.contains(letter)))
                .copied()
                .collect(),
        }
    }

    /// The allowed-tuples table for a word slot.
    pub(crate) fn tuples(&self) -> Rc<Vec<Vec<Val>>> {
        Rc::new(self.words.iter().map(|word| word.to_vec()).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::Dictionary;
    use crate::error::ParseError;
    use crate::puzzle::letter_index;

    fn letters(word: &str) -> Vec<i32> {
        word.chars().map(letter_index).collect()
    }

    #[test]
    fn parse_upper_cases_and_skips_blanks() {
        let dict = Dictionary::parse("hello\n\nWORLD\n").expect("parse");
        assert_eq!(dict.len(), 2);
        assert!(dict.contains(&letters("HELLO")));
        assert!(dict.contains(&letters("WORLD")));
    }

    #[test]
    fn rejects_words_of_wrong_length() {
        let err = Dictionary::parse("hello\ncat\n").unwrap_err();
        assert_eq!(err, ParseError::BadDictionaryWord("CAT".into()));
    }

    #[test]
    fn rejects_non_letters() {
        let err = Dictionary::parse("he11o\n").unwrap_err();
        assert_eq!(err, ParseError::BadDictionaryWord("HE11O".into()));
    }

    #[test]
    fn restricts_to_letter_pool() {
        let dict = Dictionary::parse("hello\nworld\n").expect("parse");
        let pool: BTreeSet<i32> = letters("HELO").into_iter().collect();

        let restricted = dict.restrict_to(&pool);
        assert_eq!(restricted.len(), 1);
        assert!(restricted.contains(&letters("HELLO")));
        assert!(!restricted.contains(&letters("WORLD")));
    }
}
