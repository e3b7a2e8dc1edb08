use std::borrow::Cow;

use crate::lit::Lit;

use super::types::*;

// Note: `Solver` trait is NOT object-safe.

pub trait Solver: Sized {
    /// Return the signature of the solver as a `Cow<str>`.
    fn signature(&self) -> Cow<str>;

    /// Reset the solver to its initial state.
    fn reset(&mut self);

    fn num_vars(&self) -> usize;

    fn num_clauses(&self) -> usize;

    /// Create a new variable in the solver and return its positive literal.
    fn new_var(&mut self) -> Lit;

    /// Add an assumption for the next call to [`Solver::solve`].
    fn assume<L>(&mut self, lit: L)
    where
        L: Into<Lit>;

    /// Add a clause to the solver.
    /// The clause is represented by an iterator of literals.
    fn add_clause<I>(&mut self, lits: I)
    where
        I: IntoIterator,
        I::Item: Into<Lit>;

    /// Add a clause to the solver.
    /// The clause is represented by a slice of literals.
    fn add_clause_<L>(&mut self, lits: &[L])
    where
        L: Into<Lit> + Copy,
    {
        self.add_clause(lits)
    }

    fn add_unit<L>(&mut self, lit: L)
    where
        L: Into<Lit>,
    {
        self.add_clause_(&[lit.into()])
    }

    /// Solve under the pending assumptions, consuming them.
    fn solve(&mut self) -> SolveResponse;

    /// Value of the literal in the last model.
    fn value<L>(&self, lit: L) -> LitValue
    where
        L: Into<Lit>;

    /// Whether the assumption was part of the final conflict of the last `solve`.
    fn failed<L>(&self, lit: L) -> bool
    where
        L: Into<Lit>;
}
