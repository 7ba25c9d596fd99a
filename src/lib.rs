//! This crate solves Huewords letter-placement puzzles.
//!
//! A puzzle supplies a board whose coloured cells are partitioned into
//! groups, a collection of tile sets, and one given word.  The rules
//! are expressed as finite-domain constraints: tile sets must pair off
//! with same-size board groups and fill them with exactly their
//! letters, every 5-cell run must spell a dictionary word, and the
//! given word must appear in some run.  A generic constraint solver
//! then searches for a satisfying letter assignment.

pub mod dictionary;
pub mod error;
pub mod model;
pub mod puzzle;
pub mod render;
pub mod solver;

pub use dictionary::Dictionary;
pub use error::Error;
pub use error::ModelError;
pub use error::ParseError;
pub use model::PuzzleModel;
pub use puzzle::Puzzle;
pub use render::render;

/// Run the whole pipeline on raw puzzle and dictionary text and
/// return the rendered solution grid.
pub fn solve_text(puzzle_text: &str, dictionary_text: &str) -> Result<String, Error> {
    let puzzle = Puzzle::parse(puzzle_text)?;
    let dictionary = Dictionary::parse(dictionary_text)?;
    let mut model = PuzzleModel::build(&puzzle, &dictionary)?;
    let solution = model.solve()?;
    Ok(render(&model, &solution))
}
