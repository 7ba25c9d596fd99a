//! Extensional ("allowed tuples") constraints.
//!
//! The variable tuple must match one of the allowed value tuples,
//! position for position.  Pruning is support based: a candidate
//! survives only if some still-live tuple uses it.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::solver::{Constraint, Contradiction, Search, SearchResult, Val, VarToken};

#[derive(Debug)]
pub struct Table {
    vars: Vec<VarToken>,
    tuples: Rc<Vec<Vec<Val>>>,
}

impl Table {
    /// Every tuple must have the same length as `vars`.
    pub fn new<I>(vars: I, tuples: Rc<Vec<Vec<Val>>>) -> Self
    where
        I: IntoIterator<Item = VarToken>,
    {
        let vars: Vec<VarToken> = vars.into_iter().collect();
        debug_assert!(tuples.iter().all(|tuple| tuple.len() == vars.len()));
        Table { vars, tuples }
    }
}

impl Constraint for Table {
    fn vars(&self) -> Box<dyn Iterator<Item = &'_ VarToken> + '_> {
        Box::new(self.vars.iter())
    }

    fn on_updated(&self, search: &mut Search) -> SearchResult<()> {
        let mut support: Vec<BTreeSet<Val>> = vec![BTreeSet::new(); self.vars.len()];
        let mut live = false;

        'tuples: for tuple in self.tuples.iter() {
            for (&var, &val) in self.vars.iter().zip(tuple) {
                if !search.has_candidate(var, val) {
                    continue 'tuples;
                }
            }

            live = true;
            for (set, &val) in support.iter_mut().zip(tuple) {
                set.insert(val);
            }
        }

        if !live {
            return Err(Contradiction);
        }

        for (&var, support) in self.vars.iter().zip(&support) {
            let stale: Vec<Val> = search
                .get_unassigned(var)
                .filter(|val| !support.contains(val))
                .collect();

            for val in stale {
                search.remove_candidate(var, val)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::Table;
    use crate::solver::Model;

    fn tuples(rows: &[&[i32]]) -> Rc<Vec<Vec<i32>>> {
        Rc::new(rows.iter().map(|row| row.to_vec()).collect())
    }

    #[test]
    fn restricts_to_allowed_tuples() {
        let mut sys = Model::new();
        let x = sys.new_var(0..3);
        let y = sys.new_var(0..3);
        sys.add_constraint(Table::new([x, y], tuples(&[&[0, 1], &[1, 2], &[2, 0]])));

        let solutions = sys.solve_all();
        assert_eq!(solutions.len(), 3);
        for dict in solutions.iter() {
            assert_eq!((dict[x] + 1) % 3, dict[y]);
        }
    }

    #[test]
    fn assignment_prunes_joint_support() {
        let mut sys = Model::new();
        let x = sys.new_var(0..3);
        let y = sys.new_var(0..3);
        sys.set_value(x, 1);
        sys.add_constraint(Table::new([x, y], tuples(&[&[0, 1], &[1, 2], &[2, 0]])));

        let dict = sys.solve_any().expect("solution");
        assert_eq!(dict[y], 2);
    }

    #[test]
    fn no_live_tuple_is_a_contradiction() {
        let mut sys = Model::new();
        let x = sys.new_var(5..8);
        let y = sys.new_var(5..8);
        sys.add_constraint(Table::new([x, y], tuples(&[&[0, 1]])));

        assert!(sys.solve_any().is_none());
    }

    #[test]
    fn empty_table_is_infeasible() {
        let mut sys = Model::new();
        let x = sys.new_var(0..2);
        sys.add_constraint(Table::new([x], Rc::new(Vec::new())));

        assert!(sys.solve_any().is_none());
    }
}
