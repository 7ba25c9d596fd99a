//! The constraint model and its solution search.

use bit_set::BitSet;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;
use std::iter;
use std::mem;
use std::ops;
use std::rc::Rc;

use crate::solver::{Constraint, Contradiction, SearchResult, Solution, Val, VarToken};

/// The candidates remaining for one variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidates(Rc<BTreeSet<Val>>);

impl Candidates {
    fn of(val: Val) -> Self {
        Candidates(Rc::new(iter::once(val).collect()))
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn contains(&self, val: Val) -> bool {
        self.0.contains(&val)
    }

    fn iter(&self) -> impl Iterator<Item = Val> + '_ {
        self.0.iter().copied()
    }

    fn min_max(&self) -> Option<(Val, Val)> {
        let min = self.0.iter().next()?;
        let max = self.0.iter().next_back()?;
        Some((*min, *max))
    }

    /// Shrink to the single value `val`.
    fn keep_only(&mut self, val: Val) {
        let set = Rc::make_mut(&mut self.0);
        set.clear();
        set.insert(val);
    }

    fn remove(&mut self, val: Val) {
        Rc::make_mut(&mut self.0).remove(&val);
    }

    fn retain_range(&mut self, min: Val, max: Val) {
        Rc::make_mut(&mut self.0).retain(|&val| min <= val && val <= max);
    }
}

impl FromIterator<Val> for Candidates {
    fn from_iter<I: IntoIterator<Item = Val>>(vals: I) -> Self {
        Candidates(Rc::new(vals.into_iter().collect()))
    }
}

/// The state of a variable during the solution search.
#[derive(Clone, Debug)]
enum VarState {
    Assigned(Val),
    Unassigned(Candidates),
}

/// An accumulated constraint model, ready to solve.
pub struct Model {
    // The number of variables in the model.
    num_vars: usize,

    // The number of guesses taken to solve the model.
    num_guesses: Cell<u32>,

    // The list of candidates for each variable.
    candidates: Vec<Candidates>,

    // The list of constraints.
    constraints: Vec<Rc<dyn Constraint>>,
}

/// The constraints, and the variables that wake them up.
struct ModelConstraints {
    constraints: Vec<Rc<dyn Constraint>>,

    // The list of constraints that each variable affects.  These will
    // be woken up when the variable's candidates are changed.
    wake: Vec<BitSet>,
}

/// Intermediate solution search state.
#[derive(Clone)]
pub struct Search<'a> {
    model: &'a Model,
    constraints: Rc<ModelConstraints>,
    vars: Vec<VarState>,

    // The list of constraints that need to be re-evaluated.
    wake: BitSet,
}

/*--------------------------------------------------------------*/

impl Model {
    /// Allocate a new, empty model.
    pub fn new() -> Self {
        Model {
            num_vars: 0,
            num_guesses: Cell::new(0),
            candidates: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Allocate a variable with an explicit finite set of candidates.
    pub fn new_var<I: IntoIterator<Item = Val>>(&mut self, candidates: I) -> VarToken {
        let var = VarToken(self.num_vars);
        self.num_vars += 1;
        self.candidates.push(candidates.into_iter().collect());
        var
    }

    /// Allocate a boolean (0/1) variable.
    pub fn new_bool(&mut self) -> VarToken {
        self.new_var([0, 1])
    }

    /// Allocate a vector of boolean variables.
    pub fn new_bools(&mut self, n: usize) -> Vec<VarToken> {
        (0..n).map(|_| self.new_bool()).collect()
    }

    /// Fix a variable to a known value.
    ///
    /// # Panics
    ///
    /// Panics if the variable was already fixed to a different value.
    pub fn set_value(&mut self, var: VarToken, value: Val) {
        let VarToken(idx) = var;
        let cs = &self.candidates[idx];

        if cs.len() == 1 && !cs.contains(value) {
            panic!("attempt to refix a fixed variable");
        }

        self.candidates[idx] = Candidates::of(value);
    }

    /// Add a constraint to the model.
    pub fn add_constraint<T>(&mut self, constraint: T)
    where
        T: Constraint + 'static,
    {
        self.constraints.push(Rc::new(constraint));
    }

    /// Find any solution to the model, or None if it is infeasible.
    pub fn solve_any(&mut self) -> Option<Solution> {
        let mut solutions = Vec::with_capacity(1);

        self.num_guesses.set(0);
        if self.num_vars > 0 {
            let mut search = Search::new(self);
            search.solve(1, &mut solutions);
        }

        solutions.pop()
    }

    /// Find all solutions to the model.  Primarily for testing.
    pub fn solve_all(&mut self) -> Vec<Solution> {
        let mut solutions = Vec::new();

        self.num_guesses.set(0);
        if self.num_vars > 0 {
            let mut search = Search::new(self);
            search.solve(usize::MAX, &mut solutions);
        }

        solutions
    }

    /// The number of variables allocated so far.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Get the number of guesses taken to solve the last model.
    pub fn num_guesses(&self) -> u32 {
        self.num_guesses.get()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

/*--------------------------------------------------------------*/

impl ModelConstraints {
    fn new(model: &Model) -> Self {
        let wake = Self::init_wake(&model.constraints, model.num_vars);
        ModelConstraints {
            constraints: model.constraints.clone(),
            wake,
        }
    }

    /// Determine which variables wake up which constraints.
    fn init_wake(constraints: &[Rc<dyn Constraint>], num_vars: usize) -> Vec<BitSet> {
        let mut wake = vec![BitSet::new(); num_vars];
        for (cidx, constraint) in constraints.iter().enumerate() {
            for &VarToken(idx) in constraint.vars() {
                wake[idx].insert(cidx);
            }
        }

        wake
    }
}

/*--------------------------------------------------------------*/

impl<'a> Search<'a> {
    /// Allocate a new searcher over the given model.
    fn new(model: &'a Model) -> Self {
        let constraints = ModelConstraints::new(model);
        let vars = model
            .candidates
            .iter()
            .map(|cs| VarState::Unassigned(cs.clone()))
            .collect();
        let mut wake = BitSet::new();

        for cidx in 0..constraints.constraints.len() {
            wake.insert(cidx);
        }

        Search {
            model,
            constraints: Rc::new(constraints),
            vars,
            wake,
        }
    }

    /// Check if the variable has been assigned to a value.
    pub fn is_assigned(&self, var: VarToken) -> bool {
        let VarToken(idx) = var;
        matches!(self.vars[idx], VarState::Assigned(_))
    }

    /// Get the value assigned to a variable, or None.
    ///
    /// This should be used if the variable may potentially be
    /// unassigned.  For example, when implementing constraints.
    pub fn get_assigned(&self, var: VarToken) -> Option<Val> {
        let VarToken(idx) = var;
        match self.vars[idx] {
            VarState::Assigned(val) => Some(val),
            VarState::Unassigned(_) => None,
        }
    }

    /// Get an iterator over the candidates of an unassigned variable.
    pub fn get_unassigned(&self, var: VarToken) -> Box<dyn Iterator<Item = Val> + '_> {
        let VarToken(idx) = var;
        match &self.vars[idx] {
            VarState::Assigned(_) => Box::new(iter::empty()),
            VarState::Unassigned(cs) => Box::new(cs.iter()),
        }
    }

    /// Check if the variable can still take the given value.
    pub fn has_candidate(&self, var: VarToken, val: Val) -> bool {
        let VarToken(idx) = var;
        match &self.vars[idx] {
            VarState::Assigned(v) => *v == val,
            VarState::Unassigned(cs) => cs.contains(val),
        }
    }

    /// Get the minimum and maximum values for a variable.
    pub fn get_min_max(&self, var: VarToken) -> SearchResult<(Val, Val)> {
        let VarToken(idx) = var;
        match &self.vars[idx] {
            VarState::Assigned(val) => Ok((*val, *val)),
            VarState::Unassigned(cs) => cs.min_max().ok_or(Contradiction),
        }
    }

    /// Set a variable to a value.
    pub fn set_candidate(&mut self, var: VarToken, val: Val) -> SearchResult<()> {
        let VarToken(idx) = var;

        match &mut self.vars[idx] {
            VarState::Assigned(v) => bool_to_result(*v == val),
            VarState::Unassigned(cs) => {
                if !cs.contains(val) {
                    return Err(Contradiction);
                }

                if cs.len() > 1 {
                    cs.keep_only(val);
                    self.wake.union_with(&self.constraints.wake[idx]);
                }

                Ok(())
            }
        }
    }

    /// Remove a single candidate from a variable.
    pub fn remove_candidate(&mut self, var: VarToken, val: Val) -> SearchResult<()> {
        let VarToken(idx) = var;

        match &mut self.vars[idx] {
            VarState::Assigned(v) => bool_to_result(*v != val),
            VarState::Unassigned(cs) => {
                if cs.contains(val) {
                    cs.remove(val);
                    self.wake.union_with(&self.constraints.wake[idx]);
                }

                bool_to_result(!cs.is_empty())
            }
        }
    }

    /// Restrict a variable to the given inclusive range.
    pub fn bound_candidate_range(&mut self, var: VarToken, min: Val, max: Val) -> SearchResult<()> {
        let VarToken(idx) = var;

        match &mut self.vars[idx] {
            VarState::Assigned(v) => bool_to_result(min <= *v && *v <= max),
            VarState::Unassigned(cs) => {
                let (curr_min, curr_max) = cs.min_max().ok_or(Contradiction)?;

                if curr_min < min || max < curr_max {
                    cs.retain_range(min, max);
                    if cs.is_empty() {
                        return Err(Contradiction);
                    }
                    self.wake.union_with(&self.constraints.wake[idx]);
                }

                Ok(())
            }
        }
    }

    /// Solve the model, finding up to `count` solutions.
    fn solve(&mut self, count: usize, solutions: &mut Vec<Solution>) {
        if self.constrain().is_err() {
            return;
        }

        let next_unassigned = self
            .vars
            .iter()
            .enumerate()
            .min_by_key(|&(_, vs)| match vs {
                VarState::Unassigned(cs) => cs.len(),
                VarState::Assigned(_) => usize::MAX,
            });

        if let Some((idx, &VarState::Unassigned(ref cs))) = next_unassigned {
            if cs.is_empty() {
                // Contradiction.
                return;
            }

            for val in cs.iter() {
                let num_guesses = self.model.num_guesses.get() + 1;
                self.model.num_guesses.set(num_guesses);

                let mut new = self.clone();
                if new.assign(idx, val).is_err() {
                    continue;
                }

                new.solve(count, solutions);
                if solutions.len() >= count {
                    // Reached desired number of solutions.
                    return;
                }
            }
        } else {
            // No unassigned variables remaining.
            let vars = (0..self.model.num_vars)
                .map(|idx| self[VarToken(idx)])
                .collect();
            solutions.push(Solution { vars });
        }
    }

    /// Assign a variable (given by index) to a value.
    fn assign(&mut self, idx: usize, val: Val) -> SearchResult<()> {
        let var = VarToken(idx);
        self.vars[idx] = VarState::Assigned(val);
        self.wake.union_with(&self.constraints.wake[idx]);

        for cidx in 0..self.constraints.constraints.len() {
            if self.constraints.wake[idx].contains(cidx) {
                let constraint = self.constraints.constraints[cidx].clone();
                constraint.on_assigned(self, var, val)?;
            }
        }

        Ok(())
    }

    /// Take any obvious non-choices, using the constraints to
    /// eliminate candidates.  Stops when it must start guessing.
    fn constrain(&mut self) -> SearchResult<()> {
        while !self.wake.is_empty() {
            // "Gimme" phase:
            // - abort if any variables with 0 candidates,
            // - assign variables with only 1 candidate,
            // - repeat until no more gimmes found.
            let cycle = self.vars.len();
            let mut idx = 0;
            let mut last_gimme = cycle - 1;
            loop {
                let gimme = match &self.vars[idx] {
                    VarState::Assigned(_) => None,
                    VarState::Unassigned(cs) => match cs.len() {
                        0 => return Err(Contradiction),
                        1 => cs.iter().next(),
                        _ => None,
                    },
                };

                if let Some(val) = gimme {
                    self.assign(idx, val)?;
                    last_gimme = idx;
                } else if idx == last_gimme {
                    break;
                }

                idx = if idx + 1 >= cycle { 0 } else { idx + 1 };
            }

            // Apply constraints.
            if !self.wake.is_empty() {
                let wake = mem::replace(&mut self.wake, BitSet::new());
                for cidx in wake.iter() {
                    let constraint = self.constraints.constraints[cidx].clone();
                    constraint.on_updated(self)?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Search<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Search={{")?;
        for (idx, var) in self.vars.iter().enumerate() {
            writeln!(f)?;

            match var {
                VarState::Assigned(val) => {
                    write!(f, "  var {}: {}", idx, val)?;
                }
                VarState::Unassigned(cs) => {
                    write!(f, "  var {}:", idx)?;
                    for val in cs.iter() {
                        write!(f, " {}", val)?;
                    }
                }
            }
        }
        write!(f, "}}")?;
        Ok(())
    }
}

impl ops::Index<VarToken> for Search<'_> {
    type Output = Val;

    /// Get the value assigned to a variable.
    ///
    /// # Panics
    ///
    /// Panics if the variable has not been assigned.
    fn index(&self, var: VarToken) -> &Val {
        let VarToken(idx) = var;
        match &self.vars[idx] {
            VarState::Assigned(val) => val,
            VarState::Unassigned(_) => panic!("unassigned"),
        }
    }
}

fn bool_to_result(cond: bool) -> SearchResult<()> {
    if cond {
        Ok(())
    } else {
        Err(Contradiction)
    }
}

#[cfg(test)]
mod tests {
    use crate::solver::Model;

    #[test]
    fn test_no_vars() {
        let mut sys = Model::new();
        sys.solve_any();
        sys.solve_all();
    }

    #[test]
    fn test_no_constraints() {
        let mut sys = Model::new();
        let x = sys.new_var([1, 2]);
        let y = sys.new_var([3, 4]);

        let solutions = sys.solve_all();
        assert_eq!(solutions.len(), 4);

        let solution = sys.solve_any().expect("solution");
        assert!(solution[x] == 1 || solution[x] == 2);
        assert!(solution[y] == 3 || solution[y] == 4);
    }

    #[test]
    fn test_empty_domain() {
        let mut sys = Model::new();
        let _ = sys.new_var(std::iter::empty());
        assert!(sys.solve_any().is_none());
    }

    #[test]
    fn test_set_value() {
        let mut sys = Model::new();
        let x = sys.new_var(0..10);
        sys.set_value(x, 7);

        let solutions = sys.solve_all();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0][x], 7);
    }
}
