//! Unit-coefficient linear sums, with bounds-consistency propagation.

use crate::solver::{Constraint, Contradiction, Search, SearchResult, Val, VarToken};

/// Sum of the variables == total.
#[derive(Debug)]
pub struct SumEquals {
    vars: Vec<VarToken>,
    total: Val,
}

/// Sum of the variables >= total.
#[derive(Debug)]
pub struct SumAtLeast {
    vars: Vec<VarToken>,
    total: Val,
}

impl SumEquals {
    pub fn new<I>(vars: I, total: Val) -> Self
    where
        I: IntoIterator<Item = VarToken>,
    {
        SumEquals {
            vars: vars.into_iter().collect(),
            total,
        }
    }
}

impl SumAtLeast {
    pub fn new<I>(vars: I, total: Val) -> Self
    where
        I: IntoIterator<Item = VarToken>,
    {
        SumAtLeast {
            vars: vars.into_iter().collect(),
            total,
        }
    }
}

/// The (min, max) bound of each variable, or a contradiction if any
/// variable has run out of candidates.
pub(crate) fn bounds(search: &Search, vars: &[VarToken]) -> SearchResult<Vec<(Val, Val)>> {
    vars.iter().map(|&var| search.get_min_max(var)).collect()
}

/// Tighten every variable against `sum == total`, given the bounds
/// returned by [`bounds`].
pub(crate) fn prune_to_sum(
    search: &mut Search,
    vars: &[VarToken],
    bounds: &[(Val, Val)],
    total: Val,
) -> SearchResult<()> {
    let sum_min: Val = bounds.iter().map(|&(min, _)| min).sum();
    let sum_max: Val = bounds.iter().map(|&(_, max)| max).sum();

    if total < sum_min || sum_max < total {
        return Err(Contradiction);
    }

    for (&var, &(min, max)) in vars.iter().zip(bounds) {
        // The slack left by the other variables.
        let lo = total - (sum_max - max);
        let hi = total - (sum_min - min);
        search.bound_candidate_range(var, lo, hi)?;
    }

    Ok(())
}

impl Constraint for SumEquals {
    fn vars(&self) -> Box<dyn Iterator<Item = &'_ VarToken> + '_> {
        Box::new(self.vars.iter())
    }

    fn on_updated(&self, search: &mut Search) -> SearchResult<()> {
        let bounds = bounds(search, &self.vars)?;
        prune_to_sum(search, &self.vars, &bounds, self.total)
    }
}

impl Constraint for SumAtLeast {
    fn vars(&self) -> Box<dyn Iterator<Item = &'_ VarToken> + '_> {
        Box::new(self.vars.iter())
    }

    fn on_updated(&self, search: &mut Search) -> SearchResult<()> {
        let bounds = bounds(search, &self.vars)?;
        let sum_max: Val = bounds.iter().map(|&(_, max)| max).sum();

        if sum_max < self.total {
            return Err(Contradiction);
        }

        for (&var, &(_, max)) in self.vars.iter().zip(&bounds) {
            let lo = self.total - (sum_max - max);
            search.bound_candidate_range(var, lo, Val::MAX)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SumAtLeast, SumEquals};
    use crate::solver::Model;

    #[test]
    fn sum_equals_prunes() {
        let mut sys = Model::new();
        let x = sys.new_var(0..10);
        let y = sys.new_var(0..10);
        sys.add_constraint(SumEquals::new([x, y], 17));

        let solutions = sys.solve_all();
        assert_eq!(solutions.len(), 2);
        for dict in solutions.iter() {
            assert_eq!(dict[x] + dict[y], 17);
        }
    }

    #[test]
    fn sum_equals_infeasible() {
        let mut sys = Model::new();
        let x = sys.new_var(0..3);
        let y = sys.new_var(0..3);
        sys.add_constraint(SumEquals::new([x, y], 10));
        assert!(sys.solve_any().is_none());
    }

    #[test]
    fn exactly_one_bool() {
        let mut sys = Model::new();
        let vars = sys.new_bools(4);
        sys.add_constraint(SumEquals::new(vars.iter().copied(), 1));

        let solutions = sys.solve_all();
        assert_eq!(solutions.len(), 4);
        for dict in solutions.iter() {
            let ones: i32 = vars.iter().map(|&v| dict[v]).sum();
            assert_eq!(ones, 1);
        }
    }

    #[test]
    fn at_least_one_bool() {
        let mut sys = Model::new();
        let vars = sys.new_bools(3);
        sys.add_constraint(SumAtLeast::new(vars.iter().copied(), 1));

        // All combinations except all-zero.
        let solutions = sys.solve_all();
        assert_eq!(solutions.len(), 7);
    }

    #[test]
    fn at_least_forces_last_bool() {
        let mut sys = Model::new();
        let x = sys.new_bool();
        let y = sys.new_bool();
        sys.set_value(x, 0);
        sys.add_constraint(SumAtLeast::new([x, y], 1));

        let dict = sys.solve_any().expect("solution");
        assert_eq!(dict[y], 1);
    }
}
