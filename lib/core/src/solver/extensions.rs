use crate::lit::Lit;

use super::{LitValue, Solver};

impl<S> SolverExt for S where S: Solver {}

pub trait SolverExt: Solver {
    fn new_var_vec(&mut self, len: usize) -> Vec<Lit> {
        (0..len).map(|_| self.new_var()).collect()
    }

    fn assume_all<I>(&mut self, lits: I)
    where
        I: IntoIterator,
        I::Item: Into<Lit>,
    {
        for lit in lits {
            self.assume(lit);
        }
    }

    /// Values of variables `1..=num_vars` in the last model, `None` for unconstrained ones.
    fn model(&self) -> Vec<Option<bool>> {
        (1..=self.num_vars() as u32)
            .map(|v| match self.value(Lit::positive(v)) {
                LitValue::DontCare => None,
                value => Some(value.bool()),
            })
            .collect()
    }
}
