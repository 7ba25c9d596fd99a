//! Translation of a parsed puzzle into a constraint model.
//!
//! Every coloured cell gets a letter variable plus one boolean
//! indicator per letter, channelled both ways.  Tile sets and board
//! groups are matched by a boolean bijection matrix; a match forces
//! the board group's letter counts to equal the tile set's.  Word
//! slots are restricted to the filtered dictionary by allowed-tuples
//! tables, and the given word must land in at least one slot.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};

use crate::dictionary::Dictionary;
use crate::error::{Error, ModelError};
use crate::puzzle::{Board, BoardGroup, CellPos, Puzzle, WordSlot, NUM_LETTERS, WORD_LEN};
use crate::solver::constraint::{Indicator, ReifiedSum, SumAtLeast, SumEquals, Table};
use crate::solver::{Model, Solution, Val, VarToken};

/// Board-group sizes that can receive a tile set.
const GROUP_SIZES: [usize; 2] = [3, 4];

/// The variables of one coloured cell.
struct CellVars {
    /// The letter placed in the cell, in `0..26`.
    letter: VarToken,
    /// One boolean per letter value, channelled to `letter`.
    indicators: Vec<VarToken>,
}

/// The constraint model for one puzzle, ready to solve.
pub struct PuzzleModel {
    model: Model,
    board: Board,
    cells: Vec<Vec<Option<CellVars>>>,
    groups: Vec<BoardGroup>,
    slots: Vec<WordSlot>,
    matches: Vec<Vec<VarToken>>,
    given_at: Vec<VarToken>,
}

impl PuzzleModel {
    /// Build the constraint model for a puzzle.
    ///
    /// Structural defects (bad group sizes, tile sets with no matching
    /// board group, a board without word slots) are reported here,
    /// before any solving starts.
    pub fn build(puzzle: &Puzzle, dictionary: &Dictionary) -> Result<Self, Error> {
        let board = puzzle.board.clone();
        let groups = discover_groups(&board)?;
        check_group_counts(puzzle, &groups)?;

        let slots = discover_slots(&board);
        if slots.is_empty() {
            return Err(ModelError::NoWordSlot.into());
        }

        let dictionary = dictionary.restrict_to(&puzzle.letter_pool());
        info!(
            "{} board groups, {} word slots, {} candidate words",
            groups.len(),
            slots.len(),
            dictionary.len()
        );

        let mut model = Model::new();

        // Per-cell variables.  Cells in a board group of size s may
        // only hold letters occurring in some tile set of size s;
        // cells outside any board group (5-run cells) are governed by
        // the word-slot tables alone.
        let size_pools: HashMap<usize, Vec<Val>> = GROUP_SIZES
            .iter()
            .map(|&size| {
                let pool: Vec<Val> = puzzle.letter_pool_of_size(size).into_iter().collect();
                (size, pool)
            })
            .collect();

        let mut group_size: HashMap<CellPos, usize> = HashMap::new();
        for group in &groups {
            for &pos in &group.cells {
                group_size.insert(pos, group.cells.len());
            }
        }

        let mut cells: Vec<Vec<Option<CellVars>>> = (0..board.num_rows())
            .map(|_| (0..board.num_cols()).map(|_| None).collect())
            .collect();

        for pos in board.cells() {
            if !board.is_colored(pos) {
                continue;
            }

            let allowed: Vec<Val> = match group_size.get(&pos) {
                Some(size) => size_pools[size].clone(),
                None => (0..NUM_LETTERS as Val).collect(),
            };

            let letter = model.new_var(allowed.iter().copied());
            let indicators = model.new_bools(NUM_LETTERS);
            for (l, &ind) in indicators.iter().enumerate() {
                let l = l as Val;
                model.add_constraint(Indicator::new(letter, l, ind));
                if !allowed.contains(&l) {
                    model.set_value(ind, 0);
                }
            }

            // Exactly one letter per coloured cell.
            model.add_constraint(SumEquals::new(indicators.iter().copied(), 1));

            let (row, col) = pos;
            cells[row][col] = Some(CellVars { letter, indicators });
        }

        // Bijection between tile sets and board groups: one boolean
        // per pair, forced false on size mismatch; every row and every
        // column of the matrix sums to one.
        let mut matches: Vec<Vec<VarToken>> = Vec::with_capacity(puzzle.letter_groups.len());
        for lg in &puzzle.letter_groups {
            let row: Vec<VarToken> = groups
                .iter()
                .map(|bg| {
                    let var = model.new_bool();
                    if lg.len() != bg.cells.len() {
                        model.set_value(var, 0);
                    }
                    var
                })
                .collect();
            model.add_constraint(SumEquals::new(row.iter().copied(), 1));
            matches.push(row);
        }
        for bi in 0..groups.len() {
            model.add_constraint(SumEquals::new(matches.iter().map(|row| row[bi]), 1));
        }

        // A matched board group must use all letters of its tile set,
        // with exact per-letter counts.
        for (li, lg) in puzzle.letter_groups.iter().enumerate() {
            for (bi, bg) in groups.iter().enumerate() {
                if lg.len() != bg.cells.len() {
                    continue;
                }
                for letter in lg.distinct() {
                    let indicators = bg
                        .cells
                        .iter()
                        .map(|&pos| cell_vars(&cells, pos).indicators[letter as usize]);
                    model.add_constraint(ReifiedSum::new(
                        matches[li][bi],
                        indicators,
                        lg.count_of(letter),
                    ));
                }
            }
        }

        // Every word slot must spell a dictionary word.
        let tuples = dictionary.tuples();
        for slot in &slots {
            let vars = slot.cells.iter().map(|&pos| cell_vars(&cells, pos).letter);
            model.add_constraint(Table::new(vars, Rc::clone(&tuples)));
        }

        // The given word must occupy at least one slot.
        let mut given_at = Vec::with_capacity(slots.len());
        for slot in &slots {
            let cond = model.new_bool();
            let hits = slot
                .cells
                .iter()
                .zip(&puzzle.given)
                .map(|(&pos, &letter)| cell_vars(&cells, pos).indicators[letter as usize]);
            model.add_constraint(ReifiedSum::new(cond, hits, WORD_LEN as Val));
            given_at.push(cond);
        }
        model.add_constraint(SumAtLeast::new(given_at.iter().copied(), 1));

        Ok(PuzzleModel {
            model,
            board,
            cells,
            groups,
            slots,
            matches,
            given_at,
        })
    }

    /// Ask the solver for a satisfying assignment.
    pub fn solve(&mut self) -> Result<Solution, Error> {
        debug!("solving a model of {} variables", self.model.num_vars());
        match self.model.solve_any() {
            Some(solution) => {
                debug!("solved in {} guesses", self.model.num_guesses());
                Ok(solution)
            }
            None => Err(Error::Infeasible),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The discovered board groups, in first-encounter order.
    pub fn board_groups(&self) -> &[BoardGroup] {
        &self.groups
    }

    /// The discovered word slots: row runs first, then column runs.
    pub fn word_slots(&self) -> &[WordSlot] {
        &self.slots
    }

    /// The letter variable of a coloured cell, or None for `.` cells.
    pub fn letter_var(&self, (row, col): CellPos) -> Option<VarToken> {
        self.cells[row][col].as_ref().map(|cv| cv.letter)
    }

    /// `matches()[lg][bg]`: the boolean matching tile set `lg` to
    /// board group `bg`.
    pub fn match_vars(&self) -> &[Vec<VarToken>] {
        &self.matches
    }

    /// One boolean per word slot: the given word occupies that slot.
    pub fn given_vars(&self) -> &[VarToken] {
        &self.given_at
    }
}

fn cell_vars(cells: &[Vec<Option<CellVars>>], (row, col): CellPos) -> &CellVars {
    cells[row][col].as_ref().expect("coloured cell")
}

/// Collect cells sharing a label into board groups, in first-encounter
/// order.  Groups of 3 or 4 cells are kept; a digit-labeled 5-cell
/// straight run is word-slot territory and carries no tile set;
/// anything else is a structural defect.  Letter-labeled runs are
/// rejected here because slot discovery only scans digit labels, so
/// their cells would otherwise end up unconstrained.
fn discover_groups(board: &Board) -> Result<Vec<BoardGroup>, ModelError> {
    let mut found: Vec<BoardGroup> = Vec::new();
    for pos in board.cells() {
        let label = board.label(pos);
        if label == '.' {
            continue;
        }
        match found.iter_mut().find(|group| group.label == label) {
            Some(group) => group.cells.push(pos),
            None => found.push(BoardGroup {
                label,
                cells: vec![pos],
            }),
        }
    }

    let mut groups = Vec::new();
    for group in found {
        match group.cells.len() {
            3 | 4 => groups.push(group),
            WORD_LEN if group.label.is_ascii_digit() && is_straight_run(&group.cells) => {
                debug!("label {:?} is a 5-cell run, not a board group", group.label);
            }
            size => {
                return Err(ModelError::BadGroupSize {
                    label: group.label,
                    size,
                })
            }
        }
    }

    Ok(groups)
}

/// Cells form one unbroken horizontal or vertical line.  The input is
/// in row-major order.
fn is_straight_run(cells: &[CellPos]) -> bool {
    let (row0, col0) = cells[0];
    let horizontal = cells
        .iter()
        .enumerate()
        .all(|(i, &(row, col))| row == row0 && col == col0 + i);
    let vertical = cells
        .iter()
        .enumerate()
        .all(|(i, &(row, col))| row == row0 + i && col == col0);

    horizontal || vertical
}

/// Tile sets and board groups must pair off exactly, size by size.
fn check_group_counts(puzzle: &Puzzle, groups: &[BoardGroup]) -> Result<(), ModelError> {
    for size in GROUP_SIZES {
        let letter_groups = puzzle
            .letter_groups
            .iter()
            .filter(|lg| lg.len() == size)
            .count();
        let board_groups = groups.iter().filter(|g| g.cells.len() == size).count();

        if letter_groups != board_groups {
            return Err(ModelError::GroupCountMismatch {
                size,
                letter_groups,
                board_groups,
            });
        }
    }

    Ok(())
}

/// Every 5-cell window of all-digit labels, across each row and each
/// column.  Overlapping windows each become their own slot.
fn discover_slots(board: &Board) -> Vec<WordSlot> {
    let mut slots = Vec::new();

    for row in 0..board.num_rows() {
        for col in 0..(board.num_cols() + 1).saturating_sub(WORD_LEN) {
            let cells: Vec<CellPos> = (0..WORD_LEN).map(|i| (row, col + i)).collect();
            if cells.iter().all(|&pos| board.label(pos).is_ascii_digit()) {
                slots.push(WordSlot {
                    cells: cells.try_into().expect("slot length"),
                });
            }
        }
    }

    for col in 0..board.num_cols() {
        for row in 0..(board.num_rows() + 1).saturating_sub(WORD_LEN) {
            let cells: Vec<CellPos> = (0..WORD_LEN).map(|i| (row + i, col)).collect();
            if cells.iter().all(|&pos| board.label(pos).is_ascii_digit()) {
                slots.push(WordSlot {
                    cells: cells.try_into().expect("slot length"),
                });
            }
        }
    }

    slots
}
