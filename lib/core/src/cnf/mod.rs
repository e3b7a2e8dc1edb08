use std::fmt::{Debug, Display, Formatter};
use std::path::Path;
use std::slice::Iter;

use itertools::Itertools;

pub use self::clause::Clause;
pub use self::parsing::CnfError;

pub mod clause;
mod parsing;

/// Clause list together with the number of variables it ranges over.
#[derive(Debug, Clone, PartialEq)]
pub struct Cnf {
    pub max_var: usize,
    pub clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new() -> Self {
        Self {
            max_var: 0,
            clauses: Vec::new(),
        }
    }

    /// Load a DIMACS CNF file, transparently decompressing `.gz` files.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CnfError> {
        parsing::parse_cnf_file(path.as_ref())
    }

    pub fn from_dimacs(input: &str) -> Result<Self, CnfError> {
        parsing::parse_cnf_str(input)
    }

    pub fn iter(&self) -> Iter<'_, Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Default for Cnf {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> From<I> for Cnf
where
    I: IntoIterator,
    I::Item: Into<Clause>,
{
    fn from(iter: I) -> Self {
        let mut cnf = Self::new();
        for clause in iter.into_iter() {
            cnf.add_clause(clause)
        }
        cnf
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.max_var, self.clauses.len())?;
        for clause in self.clauses.iter() {
            writeln!(f, "{} 0", clause.iter().join(" "))?;
        }
        Ok(())
    }
}

impl Cnf {
    pub fn add_clause(&mut self, clause: impl Into<Clause>) {
        let clause = clause.into();
        let max_var = clause.iter().map(|lit| lit.var() as usize).max().unwrap_or(0);
        self.max_var = self.max_var.max(max_var);
        self.clauses.push(clause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cnf_display_roundtrip() {
        let cnf = Cnf::from([vec![1, -2], vec![3]]);
        assert_eq!(cnf.max_var, 3);
        let text = cnf.to_string();
        assert_eq!(text, "p cnf 3 2\n1 -2 0\n3 0\n");
        assert_eq!(Cnf::from_dimacs(&text).unwrap(), cnf);
    }
}
