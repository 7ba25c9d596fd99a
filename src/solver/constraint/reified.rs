//! Half-reified sums: cond == 1 implies sum(vars) == total.
//!
//! The sum is only enforced while `cond` is true; `cond` is forced
//! false as soon as the sum can no longer be satisfied.

use std::iter;

use crate::solver::{Constraint, Search, SearchResult, Val, VarToken};

use super::sum;

#[derive(Debug)]
pub struct ReifiedSum {
    cond: VarToken,
    vars: Vec<VarToken>,
    total: Val,
}

impl ReifiedSum {
    /// `cond` must be a boolean (0/1) variable.
    pub fn new<I>(cond: VarToken, vars: I, total: Val) -> Self
    where
        I: IntoIterator<Item = VarToken>,
    {
        ReifiedSum {
            cond,
            vars: vars.into_iter().collect(),
            total,
        }
    }
}

impl Constraint for ReifiedSum {
    fn vars(&self) -> Box<dyn Iterator<Item = &'_ VarToken> + '_> {
        Box::new(iter::once(&self.cond).chain(self.vars.iter()))
    }

    fn on_updated(&self, search: &mut Search) -> SearchResult<()> {
        match search.get_assigned(self.cond) {
            Some(0) => Ok(()),
            Some(_) => {
                let bounds = sum::bounds(search, &self.vars)?;
                sum::prune_to_sum(search, &self.vars, &bounds, self.total)
            }
            None => {
                let bounds = sum::bounds(search, &self.vars)?;
                let sum_min: Val = bounds.iter().map(|&(min, _)| min).sum();
                let sum_max: Val = bounds.iter().map(|&(_, max)| max).sum();

                if self.total < sum_min || sum_max < self.total {
                    search.set_candidate(self.cond, 0)?;
                }

                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReifiedSum;
    use crate::solver::constraint::SumAtLeast;
    use crate::solver::Model;

    #[test]
    fn true_enforces_sum() {
        let mut sys = Model::new();
        let cond = sys.new_bool();
        let x = sys.new_var(0..4);
        let y = sys.new_var(0..4);
        sys.set_value(cond, 1);
        sys.add_constraint(ReifiedSum::new(cond, [x, y], 6));

        let dict = sys.solve_any().expect("solution");
        assert_eq!(dict[x] + dict[y], 6);
    }

    #[test]
    fn false_leaves_sum_free() {
        let mut sys = Model::new();
        let cond = sys.new_bool();
        let x = sys.new_var(0..2);
        sys.set_value(cond, 0);
        sys.add_constraint(ReifiedSum::new(cond, [x], 5));

        assert!(sys.solve_any().is_some());
    }

    #[test]
    fn disentailed_sum_forces_false() {
        let mut sys = Model::new();
        let cond = sys.new_bool();
        let x = sys.new_var(0..2);
        sys.add_constraint(ReifiedSum::new(cond, [x], 5));

        for dict in sys.solve_all() {
            assert_eq!(dict[cond], 0);
        }
    }

    #[test]
    fn at_least_one_picks_the_feasible_cond() {
        let mut sys = Model::new();
        let good = sys.new_bool();
        let bad = sys.new_bool();
        let x = sys.new_var([2]);
        sys.add_constraint(ReifiedSum::new(good, [x], 2));
        sys.add_constraint(ReifiedSum::new(bad, [x], 9));
        sys.add_constraint(SumAtLeast::new([good, bad], 1));

        let dict = sys.solve_any().expect("solution");
        assert_eq!(dict[bad], 0);
        assert_eq!(dict[good], 1);
    }
}
