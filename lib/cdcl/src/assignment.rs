use std::ops::Index;

use crate::cref::ClauseRef;
use crate::idx::VarVec;
use crate::lbool::LBool;
use crate::lit::Lit;
use crate::var::Var;

#[derive(Debug, Copy, Clone, Default)]
pub struct VarData {
    pub(crate) reason: Option<ClauseRef>,
    pub(crate) level: usize,
}

/// Current partial assignment together with the trail it was built in.
#[derive(Debug, Default)]
pub struct Assignment {
    pub(crate) assignment: VarVec<LBool>, // {var: value}
    pub(crate) var_data: VarVec<VarData>, // {var: {reason,level}}
    pub(crate) trail: Vec<Lit>,
    pub(crate) trail_lim: Vec<usize>,
    pub(crate) qhead: usize,
}

impl Assignment {
    pub const fn new() -> Self {
        Self {
            assignment: VarVec::new(),
            var_data: VarVec::new(),
            trail: vec![],
            trail_lim: vec![],
            qhead: 0,
        }
    }

    pub fn init(&mut self, var: Var) {
        self.assignment.init(&var);
        self.var_data.init(&var);
    }
}

// assignment[var]
impl Index<Var> for Assignment {
    type Output = LBool;

    fn index(&self, var: Var) -> &Self::Output {
        self.assignment.index(var)
    }
}

impl Assignment {
    pub fn num_vars(&self) -> usize {
        self.assignment.len()
    }
    pub fn num_assigns(&self) -> usize {
        self.trail.len()
    }

    pub fn value_var(&self, var: Var) -> LBool {
        self.assignment[var]
    }
    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment[lit.var()] ^ lit.negated()
    }

    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        self.var_data[var].reason
    }
    pub fn level(&self, var: Var) -> usize {
        self.var_data[var].level
    }

    /// Bit of the level of `var` within a 32-bit abstraction of a set of levels.
    pub fn abstract_level(&self, var: Var) -> u32 {
        1 << (self.level(var) & 31)
    }

    pub fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }
    pub fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    /// Trail position where the given decision level starts.
    pub fn level_start(&self, level: usize) -> usize {
        if level == 0 {
            0
        } else {
            self.trail_lim[level - 1]
        }
    }

    /// If the literal is unassigned, assign it;
    /// if it's already assigned, do nothing;
    /// if it's assigned to false (conflict), return false.
    pub fn enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) -> bool {
        match self.value(lit) {
            LBool::Undef => {
                self.unchecked_enqueue(lit, reason);
                true
            }
            LBool::True => true,
            LBool::False => false,
        }
    }

    pub fn unchecked_enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        debug_assert_eq!(self.value(lit), LBool::Undef);

        self.assignment[lit.var()] = LBool::from(!lit.negated());
        self.var_data[lit.var()] = VarData {
            reason,
            level: self.decision_level(),
        };
        self.trail.push(lit);
    }

    pub fn dequeue(&mut self) -> Option<Lit> {
        if self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            Some(p)
        } else {
            None
        }
    }

    /// Undo every assignment above `level`, calling `on_unassign(trail_position, lit)`
    /// for each removed literal, newest first.
    pub fn backtrack<F>(&mut self, level: usize, mut on_unassign: F)
    where
        F: FnMut(usize, Lit),
    {
        if self.decision_level() <= level {
            return;
        }
        let start = self.trail_lim[level];
        for i in (start..self.trail.len()).rev() {
            let lit = self.trail[i];
            self.assignment[lit.var()] = LBool::Undef;
            on_unassign(i, lit);
        }
        self.qhead = start;
        self.trail.truncate(start);
        self.trail_lim.truncate(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_and_backtrack() {
        let mut a = Assignment::new();
        for v in 0..4 {
            a.init(Var::new(v));
        }
        let x = Lit::from_external(1);
        let y = Lit::from_external(-2);
        let z = Lit::from_external(3);

        assert!(a.enqueue(x, None));
        a.new_decision_level();
        assert!(a.enqueue(y, None));
        assert!(a.enqueue(y, None));
        assert!(!a.enqueue(!y, None));
        a.new_decision_level();
        a.unchecked_enqueue(z, None);

        assert_eq!(a.value(y), LBool::True);
        assert_eq!(a.value_var(y.var()), LBool::False);
        assert_eq!(a.level(z.var()), 2);
        assert_eq!(a.abstract_level(z.var()), 0b100);
        assert_eq!(a.level_start(2), 2);
        assert_eq!(a.dequeue(), Some(x));

        let mut undone = Vec::new();
        a.backtrack(0, |i, lit| undone.push((i, lit)));
        assert_eq!(undone, vec![(2, z), (1, y)]);
        assert_eq!(a.decision_level(), 0);
        assert_eq!(a.trail, vec![x]);
        assert_eq!(a.qhead, 1);
        assert_eq!(a.value(z), LBool::Undef);
        assert_eq!(a.value(x), LBool::True);
    }
}
