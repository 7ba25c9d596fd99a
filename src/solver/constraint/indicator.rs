//! Channeling between a variable and a boolean indicator:
//! cond == 1 iff var == value.

use std::iter;

use crate::solver::{Constraint, Search, SearchResult, Val, VarToken};

#[derive(Debug)]
pub struct Indicator {
    var: VarToken,
    value: Val,
    cond: VarToken,
}

impl Indicator {
    /// `cond` must be a boolean (0/1) variable.
    pub fn new(var: VarToken, value: Val, cond: VarToken) -> Self {
        Indicator { var, value, cond }
    }
}

impl Constraint for Indicator {
    fn vars(&self) -> Box<dyn Iterator<Item = &'_ VarToken> + '_> {
        Box::new(iter::once(&self.var).chain(iter::once(&self.cond)))
    }

    fn on_assigned(&self, search: &mut Search, var: VarToken, val: Val) -> SearchResult<()> {
        if var == self.cond {
            if val == 1 {
                search.set_candidate(self.var, self.value)
            } else {
                search.remove_candidate(self.var, self.value)
            }
        } else {
            let truth = Val::from(val == self.value);
            search.set_candidate(self.cond, truth)
        }
    }

    fn on_updated(&self, search: &mut Search) -> SearchResult<()> {
        match search.get_assigned(self.cond) {
            Some(1) => search.set_candidate(self.var, self.value),
            Some(_) => search.remove_candidate(self.var, self.value),
            None => {
                if !search.has_candidate(self.var, self.value) {
                    search.set_candidate(self.cond, 0)
                } else if search.is_assigned(self.var) {
                    // The only remaining candidate is `value`.
                    search.set_candidate(self.cond, 1)
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Indicator;
    use crate::solver::Model;

    #[test]
    fn true_forces_value() {
        let mut sys = Model::new();
        let x = sys.new_var(0..5);
        let b = sys.new_bool();
        sys.set_value(b, 1);
        sys.add_constraint(Indicator::new(x, 3, b));

        let dict = sys.solve_any().expect("solution");
        assert_eq!(dict[x], 3);
    }

    #[test]
    fn false_removes_value() {
        let mut sys = Model::new();
        let x = sys.new_var(0..2);
        let b = sys.new_bool();
        sys.set_value(b, 0);
        sys.add_constraint(Indicator::new(x, 0, b));

        let dict = sys.solve_any().expect("solution");
        assert_eq!(dict[x], 1);
    }

    #[test]
    fn value_forces_true() {
        let mut sys = Model::new();
        let x = sys.new_var(0..5);
        let b = sys.new_bool();
        sys.set_value(x, 3);
        sys.add_constraint(Indicator::new(x, 3, b));

        let dict = sys.solve_any().expect("solution");
        assert_eq!(dict[b], 1);
    }

    #[test]
    fn missing_value_forces_false() {
        let mut sys = Model::new();
        let x = sys.new_var(1..5);
        let b = sys.new_bool();
        sys.add_constraint(Indicator::new(x, 0, b));

        for dict in sys.solve_all() {
            assert_eq!(dict[b], 0);
        }
    }

    #[test]
    fn channels_both_ways() {
        let mut sys = Model::new();
        let x = sys.new_var(0..3);
        let inds: Vec<_> = (0..3)
            .map(|val| {
                let b = sys.new_bool();
                sys.add_constraint(Indicator::new(x, val, b));
                b
            })
            .collect();

        let solutions = sys.solve_all();
        assert_eq!(solutions.len(), 3);
        for dict in solutions.iter() {
            for (val, &b) in inds.iter().enumerate() {
                assert_eq!(dict[b] == 1, dict[x] == val as i32);
            }
        }
    }
}
