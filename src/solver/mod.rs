//! A small finite-domain constraint solver.
//!
//! Variables are allocated with explicit candidate sets, constraints are
//! trait objects woken by candidate changes, and the search interleaves
//! propagation to a fixpoint with backtracking on the variable that has
//! the fewest candidates left.

pub mod constraint;

mod model;

pub use constraint::Constraint;
pub use model::Model;
pub use model::Search;

use std::ops;
use thiserror::Error;

/// A solver variable token.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct VarToken(pub(crate) usize);

/// The type of a variable's value (i.e. the candidate type).
pub type Val = i32;

/// A contradiction discovered during propagation or search.
#[derive(Debug, Error)]
#[error("contradiction")]
pub struct Contradiction;

/// A result during a solution search (Err = contradiction).
pub type SearchResult<T> = Result<T, Contradiction>;

/// A dictionary mapping solver variables to the solution value.
#[derive(Debug)]
pub struct Solution {
    pub(crate) vars: Vec<Val>,
}

impl ops::Index<VarToken> for Solution {
    type Output = Val;
    fn index(&self, var: VarToken) -> &Val {
        let VarToken(idx) = var;
        &self.vars[idx]
    }
}
