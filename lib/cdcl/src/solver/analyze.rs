use crate::cref::ClauseRef;
use crate::lit::Lit;
use crate::options::CcminMode;

use super::Solver;

impl Solver {
    /// Analyze the conflict and produce a learnt clause (1-UIP scheme).
    ///
    /// **Returns:**
    ///
    /// The learnt clause, with the asserting literal at index 0 and a literal of the
    /// backtrack level at index 1, and the backtrack level itself.
    ///
    /// **Pre-conditions:**
    ///
    /// - The current decision level must be greater than root level.
    /// - The `seen` flags are all cleared.
    pub(super) fn analyze(&mut self, conflict: ClauseRef) -> (Vec<Lit>, usize) {
        debug_assert!(self.assignment.decision_level() > 0);

        // Index 0 is reserved for the asserting literal:
        let mut learnt = vec![Lit::from_code(0)];
        let decision_level = self.assignment.decision_level();
        let mut path_c = 0usize;
        let mut index = self.assignment.trail.len();
        let mut confl = conflict;
        let mut skip_first = false;

        let uip = loop {
            if self.ca.header(confl).learnt() {
                self.db.cla_bump_activity(confl, &mut self.ca);
            }

            let size = self.ca.header(confl).size();
            for j in (skip_first as usize)..size {
                let q = self.ca.clause(confl).lit(j);
                let v = q.var();
                if !self.seen[v] && self.assignment.level(v) > 0 {
                    self.var_order.var_bump_activity(v);
                    self.seen[v] = true;
                    if self.assignment.level(v) >= decision_level {
                        path_c += 1;
                    } else {
                        learnt.push(q);
                    }
                }
            }

            // Select next clause to look at:
            loop {
                index -= 1;
                if self.seen[self.assignment.trail[index].var()] {
                    break;
                }
            }
            let p = self.assignment.trail[index];
            self.seen[p.var()] = false;
            path_c -= 1;
            if path_c == 0 {
                break p;
            }
            confl = self
                .assignment
                .reason(p.var())
                .expect("literal above the UIP must have a reason");
            skip_first = true;
        };
        learnt[0] = !uip;

        // Simplify the conflict clause:
        self.analyze_toclear.clear();
        self.analyze_toclear.extend_from_slice(&learnt);
        let max_literals = learnt.len();
        match self.options.ccmin_mode {
            CcminMode::Deep => {
                let abstract_levels = learnt[1..]
                    .iter()
                    .fold(0, |acc, lit| acc | self.assignment.abstract_level(lit.var()));
                let mut j = 1;
                for i in 1..learnt.len() {
                    let lit = learnt[i];
                    if self.assignment.reason(lit.var()).is_none() || !self.lit_redundant(lit, abstract_levels) {
                        learnt[j] = lit;
                        j += 1;
                    }
                }
                learnt.truncate(j);
            }
            CcminMode::Shallow => {
                let mut j = 1;
                for i in 1..learnt.len() {
                    let lit = learnt[i];
                    let keep = match self.assignment.reason(lit.var()) {
                        None => true,
                        Some(reason) => {
                            let clause = self.ca.clause(reason);
                            (1..clause.len()).any(|k| {
                                let v = clause.lit(k).var();
                                !self.seen[v] && self.assignment.level(v) > 0
                            })
                        }
                    };
                    if keep {
                        learnt[j] = lit;
                        j += 1;
                    }
                }
                learnt.truncate(j);
            }
            CcminMode::None => {}
        }
        self.stats.max_literals += max_literals as u64;
        self.stats.tot_literals += learnt.len() as u64;

        // Find correct backtrack level:
        let backtrack_level = if learnt.len() == 1 {
            0
        } else {
            // Find the first literal assigned at the next-highest level:
            let mut max_i = 1;
            for i in 2..learnt.len() {
                if self.assignment.level(learnt[i].var()) > self.assignment.level(learnt[max_i].var()) {
                    max_i = i;
                }
            }
            // Swap-in this literal at index 1:
            learnt.swap(1, max_i);
            self.assignment.level(learnt[1].var())
        };

        for lit in &self.analyze_toclear {
            self.seen[lit.var()] = false;
        }

        (learnt, backtrack_level)
    }

    /// Check whether `p` is implied by the other literals of the learnt clause.
    ///
    /// Only explores literals whose level is in `abstract_levels`; every variable marked
    /// along the way is recorded in `analyze_toclear`, and the marks of a failed attempt
    /// are rolled back.
    fn lit_redundant(&mut self, p: Lit, abstract_levels: u32) -> bool {
        let mut stack = std::mem::take(&mut self.analyze_stack);
        stack.clear();
        stack.push(p);
        let top = self.analyze_toclear.len();
        let mut redundant = true;

        'search: while let Some(q) = stack.pop() {
            let reason = self
                .assignment
                .reason(q.var())
                .expect("only implied literals are explored");
            let size = self.ca.header(reason).size();
            for i in 1..size {
                let lit = self.ca.clause(reason).lit(i);
                let v = lit.var();
                if !self.seen[v] && self.assignment.level(v) > 0 {
                    if self.assignment.reason(v).is_some()
                        && (self.assignment.abstract_level(v) & abstract_levels) != 0
                    {
                        self.seen[v] = true;
                        stack.push(lit);
                        self.analyze_toclear.push(lit);
                    } else {
                        for lit in &self.analyze_toclear[top..] {
                            self.seen[lit.var()] = false;
                        }
                        self.analyze_toclear.truncate(top);
                        redundant = false;
                        break 'search;
                    }
                }
            }
        }

        stack.clear();
        self.analyze_stack = stack;
        redundant
    }

    /// Express the final conflict in terms of assumptions.
    ///
    /// `p` is the negation of a falsified assumption. Stores in `conflict` the set of
    /// assumption negations (including `p`) that together imply `p`.
    pub(super) fn analyze_final(&mut self, p: Lit) {
        self.conflict.clear();
        self.conflict.push(p);

        if self.assignment.decision_level() == 0 {
            return;
        }

        self.seen[p.var()] = true;
        let start = self.assignment.level_start(1);
        for i in (start..self.assignment.trail.len()).rev() {
            let lit = self.assignment.trail[i];
            let x = lit.var();
            if self.seen[x] {
                match self.assignment.reason(x) {
                    None => {
                        debug_assert!(self.assignment.level(x) > 0);
                        self.conflict.push(!lit);
                    }
                    Some(reason) => {
                        let clause = self.ca.clause(reason);
                        for j in 1..clause.len() {
                            let v = clause.lit(j).var();
                            if self.assignment.level(v) > 0 {
                                self.seen[v] = true;
                            }
                        }
                    }
                }
                self.seen[x] = false;
            }
        }
        self.seen[p.var()] = false;
    }
}
