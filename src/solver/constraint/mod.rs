//! Constraint primitives.

mod indicator;
mod reified;
mod sum;
mod table;

pub use indicator::Indicator;
pub use reified::ReifiedSum;
pub use sum::SumAtLeast;
pub use sum::SumEquals;
pub use table::Table;

use crate::solver::{Search, SearchResult, Val, VarToken};

/// Constraint behaviour during the solution search.
pub trait Constraint {
    /// An iterator over the variables that are involved in the constraint.
    fn vars(&self) -> Box<dyn Iterator<Item = &'_ VarToken> + '_>;

    /// Applied when a variable has been assigned.
    fn on_assigned(&self, _search: &mut Search, _var: VarToken, _val: Val) -> SearchResult<()> {
        Ok(())
    }

    /// Applied when a variable's candidates have been modified.
    fn on_updated(&self, _search: &mut Search) -> SearchResult<()> {
        Ok(())
    }
}
