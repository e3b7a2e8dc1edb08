use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use tap::Tap;
use tracing::{debug, info};

use crate::assignment::Assignment;
use crate::budget::{Budget, Interrupt};
use crate::clause::MARK_DELETED;
use crate::clause_allocator::ClauseAllocator;
use crate::clause_database::ClauseDatabase;
use crate::cref::ClauseRef;
use crate::error::Result;
use crate::idx::VarVec;
use crate::lbool::LBool;
use crate::learning::{LearningGuard, LearningStrategy};
use crate::lit::Lit;
use crate::options::{Options, PhaseSaving};
use crate::restart::RestartStrategy;
use crate::stats::Statistics;
use crate::utils::measure_time;
use crate::var::Var;
use crate::var_order::VarOrder;
use crate::watch::Watcher;
use crate::watch::WatchList;

mod analyze;
mod reduce;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveResult {
    Sat,
    Unsat,
    Unknown,
}

impl Display for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveResult::Sat => write!(f, "SAT"),
            SolveResult::Unsat => write!(f, "UNSAT"),
            SolveResult::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug)]
pub struct Solver {
    options: Options,
    ca: ClauseAllocator,
    db: ClauseDatabase,
    watches: WatchList,
    assignment: Assignment,
    var_order: VarOrder,
    restart: RestartStrategy,
    learning: LearningGuard,
    budget: Budget,
    stats: Statistics,
    /// `false` once the clause set is known to be unsatisfiable at the root level.
    ok: bool,
    assumptions: Vec<Lit>,
    /// Satisfying assignment found by the last `solve`, if any.
    model: VarVec<LBool>,
    /// Final conflict over negated assumptions, if the last `solve` failed under assumptions.
    conflict: Vec<Lit>,
    // Conflict analysis:
    seen: VarVec<bool>,
    analyze_stack: Vec<Lit>,
    analyze_toclear: Vec<Lit>,
    // Simplification:
    simp_db_assigns: Option<usize>,
    simp_db_props: i64,
}

impl Solver {
    /// Create a solver with the given options.
    ///
    /// Panics if the options are invalid, see [`Solver::try_new`].
    pub fn new(options: Options) -> Self {
        match Self::try_new(options) {
            Ok(solver) => solver,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            ca: ClauseAllocator::new(),
            db: ClauseDatabase::new(&options),
            watches: WatchList::new(),
            assignment: Assignment::new(),
            var_order: VarOrder::new(&options),
            restart: RestartStrategy::from_options(&options),
            learning: LearningGuard::new(LearningStrategy::from_options(&options)),
            budget: Budget::new(),
            stats: Statistics::default(),
            ok: true,
            assumptions: Vec::new(),
            model: VarVec::new(),
            conflict: Vec::new(),
            seen: VarVec::new(),
            analyze_stack: Vec::new(),
            analyze_toclear: Vec::new(),
            simp_db_assigns: None,
            simp_db_props: 0,
            options,
        })
    }

    /// Limit the clause arena to `limit` words (the default is the whole 32-bit range).
    pub fn with_arena_limit(mut self, limit: usize) -> Self {
        assert!(self.ca.is_empty(), "arena limit must be set before adding clauses");
        self.ca = ClauseAllocator::with_limit(limit);
        self
    }

    /// Forget all variables and clauses, keeping the options and the interrupt token.
    pub fn reset(&mut self) {
        let interrupt = self.interrupt_handle();
        *self = Self::new(self.options.clone());
        self.budget = Budget::with_interrupt(interrupt);
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Display for Solver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solver(vars={}, clauses={}, learnts={})",
            self.num_vars(),
            self.num_clauses(),
            self.num_learnts()
        )
    }
}

impl Solver {
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Statistics, including a snapshot of the arena size.
    pub fn stats(&self) -> Statistics {
        let mut stats = self.stats.clone();
        stats.arena_words = self.ca.len();
        stats.arena_peak_words = self.ca.peak();
        stats
    }

    /// `false` if the solver has found the clause set unsatisfiable without assumptions.
    pub fn okay(&self) -> bool {
        self.ok
    }

    pub fn num_vars(&self) -> usize {
        self.assignment.num_vars()
    }
    pub fn num_clauses(&self) -> usize {
        self.db.num_clauses()
    }
    pub fn num_learnts(&self) -> usize {
        self.db.num_learnts()
    }
    pub fn num_assigns(&self) -> usize {
        self.assignment.num_assigns()
    }
    pub fn num_decisions(&self) -> u64 {
        self.stats.decisions
    }
    pub fn num_propagations(&self) -> u64 {
        self.stats.propagations
    }
    pub fn num_conflicts(&self) -> u64 {
        self.stats.conflicts
    }
    pub fn num_restarts(&self) -> u64 {
        self.stats.restarts
    }
    pub fn num_reduces(&self) -> u64 {
        self.stats.reduces
    }

    pub fn new_var(&mut self) -> Var {
        self.new_var_with(None, true)
    }

    /// Create a variable with an optional preferred polarity (`Some(true)` to branch
    /// positively first) and decision eligibility.
    pub fn new_var_with(&mut self, polarity: Option<bool>, decision: bool) -> Var {
        let var = Var::new(self.num_vars() as u32);
        self.watches.init(var);
        self.assignment.init(var);
        self.seen.init(&var);
        self.var_order.init_var(var, polarity, decision);
        var
    }

    pub fn set_polarity(&mut self, var: Var, polarity: Option<bool>) {
        self.var_order.set_user_polarity(var, polarity);
    }

    pub fn set_decision_var(&mut self, var: Var, decision: bool) {
        self.var_order.set_decision(var, decision);
    }

    pub fn value_var(&self, var: Var) -> LBool {
        self.assignment.value_var(var)
    }
    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment.value(lit)
    }

    /// Model of the last satisfiable `solve`; empty otherwise.
    pub fn model(&self) -> &[LBool] {
        self.model.as_slice()
    }

    pub fn model_value(&self, lit: Lit) -> LBool {
        match self.model.get(&lit.var()) {
            Some(&value) => value ^ lit.negated(),
            None => LBool::Undef,
        }
    }

    /// Final conflict clause: the negations of the failed assumptions.
    pub fn conflict(&self) -> &[Lit] {
        &self.conflict
    }

    /// Subset of the assumptions of the last `solve` that was found contradictory.
    pub fn failed_assumptions(&self) -> Vec<Lit> {
        self.conflict.iter().map(|&lit| !lit).collect()
    }

    pub fn failed(&self, assumption: Lit) -> bool {
        self.conflict.contains(&!assumption)
    }

    pub fn set_conflict_budget(&mut self, x: u64) {
        self.budget.set_conflict_budget(self.stats.conflicts, x);
    }
    pub fn set_propagation_budget(&mut self, x: u64) {
        self.budget.set_propagation_budget(self.stats.propagations, x);
    }
    pub fn set_time_budget(&mut self, timeout: Duration) {
        self.budget.set_time_budget(timeout);
    }
    pub fn budget_off(&mut self) {
        self.budget.budget_off();
    }

    /// Token that stops a running `solve` from any thread.
    pub fn interrupt_handle(&self) -> Interrupt {
        self.budget.interrupt().clone()
    }
    pub fn interrupt(&self) {
        self.budget.interrupt().interrupt();
    }
    pub fn clear_interrupt(&self) {
        self.budget.interrupt().clear();
    }

    fn within_budget(&self) -> bool {
        self.budget.within(self.stats.conflicts, self.stats.propagations)
    }
}

impl Solver {
    /// Add a clause at the root level.
    ///
    /// Duplicate and root-false literals are removed; tautologies and satisfied clauses
    /// are dropped. Returns `Ok(false)` if the clause set became unsatisfiable.
    pub fn add_clause(&mut self, lits: &[Lit]) -> Result<bool> {
        assert_eq!(self.assignment.decision_level(), 0);

        // If the solver is already in UNSAT state, we do not need to add new clause.
        if !self.ok {
            return Ok(false);
        }

        for lit in lits {
            assert!(
                lit.var().index() < self.num_vars(),
                "literal {} refers to an unknown variable (num_vars = {})",
                lit,
                self.num_vars()
            );
        }

        let mut ps = lits.to_vec();
        ps.sort_unstable();
        let mut j = 0;
        let mut prev: Option<Lit> = None;
        for i in 0..ps.len() {
            let lit = ps[i];
            if self.value(lit) == LBool::True || prev == Some(!lit) {
                // satisfied or tautology
                return Ok(true);
            } else if self.value(lit) != LBool::False && prev != Some(lit) {
                ps[j] = lit;
                j += 1;
                prev = Some(lit);
            }
        }
        ps.truncate(j);

        match ps.len() {
            0 => {
                self.ok = false;
            }
            1 => {
                self.assignment.unchecked_enqueue(ps[0], None);
                self.ok = self.propagate().is_none();
            }
            _ => {
                let cref = self.ca.alloc(&ps, false)?;
                self.db.clauses.push(cref);
                self.attach_clause(cref);
            }
        }
        Ok(self.ok)
    }

    fn attach_clause(&mut self, cref: ClauseRef) {
        let clause = self.ca.clause(cref);
        assert!(clause.len() >= 2, "Clause must have at least 2 literals");
        let (a, b) = (clause.lit(0), clause.lit(1));
        if clause.is_learnt() {
            self.stats.learnts_literals += clause.len() as u64;
        } else {
            self.stats.clauses_literals += clause.len() as u64;
        }
        self.watches.insert(a, Watcher { cref, blocker: b });
        self.watches.insert(b, Watcher { cref, blocker: a });
    }

    /// Detach (lazily) and free the clause.
    fn remove_clause(&mut self, cref: ClauseRef) {
        let clause = self.ca.clause(cref);
        let (a, b) = (clause.lit(0), clause.lit(1));
        if clause.is_learnt() {
            self.stats.learnts_literals -= clause.len() as u64;
        } else {
            self.stats.clauses_literals -= clause.len() as u64;
        }
        self.watches.smudge(a);
        self.watches.smudge(b);

        // Don't leave pointers to the freed memory:
        if self.locked(cref) {
            self.assignment.var_data[a.var()].reason = None;
        }
        self.ca.clause_mut(cref).set_mark(MARK_DELETED);
        self.ca.free(cref);
    }

    /// A clause is locked while it is the reason of its first literal.
    fn locked(&self, cref: ClauseRef) -> bool {
        let first = self.ca.clause(cref).lit(0);
        self.assignment.reason(first.var()) == Some(cref) && self.value(first) == LBool::True
    }

    fn satisfied(&self, cref: ClauseRef) -> bool {
        self.ca.clause(cref).lits().any(|lit| self.value(lit) == LBool::True)
    }

    /// Revert to the state at the given level, keeping all assignments at `level`.
    fn backtrack(&mut self, level: usize) {
        let current = self.assignment.decision_level();
        if current <= level {
            return;
        }
        debug!("backtrack from {} to {}", current, level);
        let last_level_start = self.assignment.level_start(current);
        let phase_saving = self.options.phase_saving;
        let var_order = &mut self.var_order;
        self.assignment.backtrack(level, |i, lit| {
            match phase_saving {
                PhaseSaving::Full => var_order.save_phase(lit),
                PhaseSaving::Limited if i > last_level_start => var_order.save_phase(lit),
                _ => {}
            }
            var_order.insert_var_order(lit.var());
        });
    }

    /// Propagate all enqueued facts.
    ///
    /// Returns the conflicting clause, if any. The propagation queue is empty afterwards,
    /// even if there was a conflict.
    fn propagate(&mut self) -> Option<ClauseRef> {
        let mut conflict = None;
        let mut num_props = 0u64;

        while let Some(p) = self.assignment.dequeue() {
            num_props += 1;
            let false_literal = !p;

            // Purge watchers of deleted clauses before any of them is moved:
            if self.watches.is_dirty(false_literal) {
                self.watches.clean(false_literal, &self.ca);
            }
            let mut ws = std::mem::take(self.watches.lookup_mut(false_literal));
            let mut i = 0;
            let mut j = 0;

            'watches: while i < ws.len() {
                let w = ws[i];
                i += 1;

                // Try to avoid inspecting the clause:
                if self.assignment.value(w.blocker) == LBool::True {
                    ws[j] = w;
                    j += 1;
                    continue;
                }

                // Make sure the false literal is at index 1:
                let cref = w.cref;
                let mut clause = self.ca.clause_mut(cref);
                if clause.lit(0) == false_literal {
                    clause.swap(0, 1);
                }
                debug_assert_eq!(clause.lit(1), false_literal);

                // If the 0th literal is `true`, then the clause is already satisfied:
                let first = clause.lit(0);
                let new_watch = Watcher { cref, blocker: first };
                if first != w.blocker && self.assignment.value(first) == LBool::True {
                    ws[j] = new_watch;
                    j += 1;
                    continue;
                }

                // Look for a new literal to watch:
                for k in 2..clause.len() {
                    let other = clause.lit(k);
                    if self.assignment.value(other) != LBool::False {
                        clause.swap(1, k);
                        self.watches.insert(other, new_watch);
                        continue 'watches;
                    }
                }

                // Did not find a new watch, so the clause is unit under the assignment or conflicting:
                ws[j] = new_watch;
                j += 1;
                if self.assignment.value(first) == LBool::False {
                    conflict = Some(cref);
                    self.assignment.qhead = self.assignment.trail.len();
                    // Copy the remaining watches:
                    while i < ws.len() {
                        ws[j] = ws[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    self.assignment.unchecked_enqueue(first, Some(cref));
                }
            }

            ws.truncate(j);
            *self.watches.lookup_mut(false_literal) = ws;
        }

        self.stats.propagations += num_props;
        self.simp_db_props -= num_props as i64;
        conflict
    }
}

impl Solver {
    pub fn solve(&mut self) -> Result<SolveResult> {
        self.solve_under_assumptions(&[])
    }

    /// Search for a model in which all `assumptions` hold.
    ///
    /// On `Unsat` with a non-empty [`Solver::failed_assumptions`], the clause set itself
    /// may still be satisfiable and the solver remains usable. Budget exhaustion and
    /// interruption yield `Unknown`.
    pub fn solve_under_assumptions(&mut self, assumptions: &[Lit]) -> Result<SolveResult> {
        self.model.clear();
        self.conflict.clear();
        if !self.ok {
            return Ok(SolveResult::Unsat);
        }
        for lit in assumptions {
            assert!(
                lit.var().index() < self.num_vars(),
                "assumption {} refers to an unknown variable",
                lit
            );
        }

        info!("Solver::solve(assumptions = {})", assumptions.len());
        self.assumptions = assumptions.to_vec();
        self.stats.solves += 1;
        self.learning.reset(self.num_clauses());
        info!(". level restarts conflicts learnts limit clauses vars");

        let time_search_start = Instant::now();
        let mut status = LBool::Undef;
        let mut current_restarts = 0;
        while status.is_undef() {
            let num_confl = self.restart.num_confl(current_restarts);
            status = match self.search(num_confl) {
                Ok(status) => status,
                Err(e) => {
                    self.backtrack(0);
                    self.assumptions.clear();
                    self.stats.time_search += time_search_start.elapsed();
                    return Err(e);
                }
            };
            if !self.within_budget() {
                break;
            }
            current_restarts += 1;
        }
        self.stats.time_search += time_search_start.elapsed();

        let result = match status {
            LBool::True => {
                self.model = self.assignment.assignment.clone();
                SolveResult::Sat
            }
            LBool::False => {
                if self.conflict.is_empty() {
                    self.ok = false;
                }
                SolveResult::Unsat
            }
            LBool::Undef => SolveResult::Unknown,
        };

        self.backtrack(0);
        self.assumptions.clear();
        info!("{}", result);
        Ok(result)
    }

    /// The main CDCL loop: propagate, then either learn from the conflict and backjump,
    /// or make a decision.
    ///
    /// **Returns:**
    ///
    /// `True` if a model was found, `False` if the clause set (or the assumptions)
    /// is unsatisfiable, and `Undef` if the conflict limit of this round or the budget
    /// was reached.
    fn search(&mut self, num_confl: Option<usize>) -> Result<LBool> {
        debug_assert!(self.ok);

        let mut current_conflicts = 0;
        self.stats.restarts += 1;

        loop {
            let time_propagate_start = Instant::now();
            let conflict = self
                .propagate()
                .tap(|_| self.stats.time_propagate += time_propagate_start.elapsed());

            if let Some(conflict) = conflict {
                // Conflict
                self.stats.conflicts += 1;
                current_conflicts += 1;

                if self.assignment.decision_level() == 0 {
                    // conflict on root level => UNSAT
                    return Ok(LBool::False);
                }

                let (time_analyze, (lemma, backtrack_level)) = measure_time(|| self.analyze(conflict));
                self.stats.time_analyze += time_analyze;
                self.backtrack(backtrack_level);

                if lemma.len() == 1 {
                    // Learn a unit clause
                    self.assignment.unchecked_enqueue(lemma[0], None);
                } else {
                    // Learn a clause
                    let cref = self.ca.alloc(&lemma, true)?;
                    self.db.learnts.push(cref);
                    self.attach_clause(cref);
                    self.db.cla_bump_activity(cref, &mut self.ca);
                    self.assignment.unchecked_enqueue(lemma[0], Some(cref));
                }

                self.var_order.var_decay_activity();
                self.db.cla_decay_activity();

                if self.learning.bump() {
                    self.log_progress('a');
                }

                if !self.within_budget() {
                    self.backtrack(0);
                    return Ok(LBool::Undef);
                }
            } else {
                // NO conflict

                // Restart:
                if num_confl.map_or(false, |n| current_conflicts >= n) || !self.within_budget() {
                    self.backtrack(0);
                    self.log_progress('r');
                    return Ok(LBool::Undef);
                }

                // Simplify the set of problem clauses:
                if self.assignment.decision_level() == 0 && !self.simplify()? {
                    return Ok(LBool::False);
                }

                // Reduce the set of learnt clauses:
                if self.options.reduce_db && self.learning.should_reduce(self.num_learnts(), self.num_assigns()) {
                    self.reduce_db()?;
                }

                let mut next = None;
                while self.assignment.decision_level() < self.assumptions.len() {
                    // Perform user provided assumption:
                    let p = self.assumptions[self.assignment.decision_level()];
                    match self.value(p) {
                        LBool::True => {
                            // Dummy decision level:
                            self.assignment.new_decision_level();
                        }
                        LBool::False => {
                            self.analyze_final(!p);
                            return Ok(LBool::False);
                        }
                        LBool::Undef => {
                            next = Some(p);
                            break;
                        }
                    }
                }

                let decision = match next {
                    Some(p) => p,
                    None => {
                        // New variable decision:
                        self.stats.decisions += 1;
                        match self.var_order.pick_branching_literal(&self.assignment, &mut self.stats) {
                            Some(lit) => lit,
                            // Model found
                            None => return Ok(LBool::True),
                        }
                    }
                };

                // Increase decision level and enqueue the decision:
                self.assignment.new_decision_level();
                self.assignment.unchecked_enqueue(decision, None);
            }
        }
    }

    fn log_progress(&self, tag: char) {
        info!(
            "{} {} {} {} {} {} {} {}",
            tag,
            self.assignment.decision_level(),
            self.stats.restarts,
            self.stats.conflicts,
            self.num_learnts(),
            self.learning.max_learnts() as u64,
            self.num_clauses(),
            self.var_order.num_decision_vars(),
        );
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::options::{CcminMode, RestartKind, DEFAULT_OPTIONS};

    fn lits(xs: &[i32]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::from_external(x)).collect()
    }

    fn solver_with(num_vars: usize, clauses: &[&[i32]], options: Options) -> Solver {
        let mut solver = Solver::new(options);
        for _ in 0..num_vars {
            solver.new_var();
        }
        for clause in clauses {
            solver.add_clause(&lits(clause)).unwrap();
        }
        solver
    }

    fn pigeonhole(n: i32) -> Vec<Vec<i32>> {
        // p(i, j): pigeon i in hole j, i in 0..=n, j in 0..n
        let p = |i: i32, j: i32| i * n + j + 1;
        let mut clauses = Vec::new();
        for i in 0..=n {
            clauses.push((0..n).map(|j| p(i, j)).collect());
        }
        for j in 0..n {
            for a in 0..=n {
                for b in (a + 1)..=n {
                    clauses.push(vec![-p(a, j), -p(b, j)]);
                }
            }
        }
        clauses
    }

    /// Every attached clause is watched by exactly its first two literals.
    pub(super) fn check_watch_invariant(solver: &Solver) {
        let all = solver.db.clauses.iter().chain(solver.db.learnts.iter());
        for &cref in all {
            let clause = solver.ca.clause(cref);
            for (lit, ws) in solver.watches.iter() {
                let n = ws.iter().filter(|w| w.cref == cref).count();
                let expected = (lit == clause.lit(0) || lit == clause.lit(1)) as usize;
                assert_eq!(n, expected, "clause {} in the watch list of {}", clause, lit);
            }
        }
    }

    #[test]
    fn test_correctness() {
        let mut solver = Solver::default();

        let tie = Lit::positive(solver.new_var());
        let shirt = Lit::positive(solver.new_var());
        solver.add_clause(&[-tie, shirt]).unwrap();
        solver.add_clause(&[tie, shirt]).unwrap();
        solver.add_clause(&[-tie, -shirt]).unwrap();

        // Problem is satisfiable.
        assert_eq!(solver.solve().unwrap(), SolveResult::Sat);

        // Check TIE is false, SHIRT is true.
        assert_eq!(solver.model_value(tie), LBool::False);
        assert_eq!(solver.model_value(shirt), LBool::True);

        // Force TIE to true.
        solver.add_clause(&[tie]).unwrap();

        // Problem is now unsatisfiable.
        assert_eq!(solver.solve().unwrap(), SolveResult::Unsat);
        assert!(!solver.okay());
        assert!(solver.failed_assumptions().is_empty());
    }

    #[test]
    fn test_add_clause_normalization() {
        let mut solver = solver_with(3, &[], DEFAULT_OPTIONS);

        // tautology is dropped
        assert!(solver.add_clause(&lits(&[1, -1, 2])).unwrap());
        assert_eq!(solver.num_clauses(), 0);

        // duplicates are merged
        assert!(solver.add_clause(&lits(&[2, 3, 2])).unwrap());
        assert_eq!(solver.num_clauses(), 1);
        assert_eq!(solver.ca.clause(solver.db.clauses[0]).len(), 2);

        // root-false literals are removed, leaving a unit
        assert!(solver.add_clause(&lits(&[-1])).unwrap());
        assert!(solver.add_clause(&lits(&[1, 3])).unwrap());
        assert_eq!(solver.value(Lit::from_external(3)), LBool::True);

        // satisfied clause is dropped
        assert!(solver.add_clause(&lits(&[3, 2])).unwrap());
        assert_eq!(solver.num_clauses(), 1);

        // empty clause
        assert!(!solver.add_clause(&[]).unwrap());
        assert!(!solver.okay());
        assert!(!solver.add_clause(&lits(&[2])).unwrap());
    }

    #[test]
    fn test_contradictory_units() {
        let mut solver = solver_with(1, &[], DEFAULT_OPTIONS);
        assert!(solver.add_clause(&lits(&[1])).unwrap());
        assert!(!solver.add_clause(&lits(&[-1])).unwrap());
        assert_eq!(solver.solve().unwrap(), SolveResult::Unsat);
    }

    #[test]
    #[should_panic(expected = "unknown variable")]
    fn test_unknown_variable_panics() {
        let mut solver = solver_with(1, &[], DEFAULT_OPTIONS);
        let _ = solver.add_clause(&lits(&[1, 2]));
    }

    #[test]
    fn test_propagation_and_backtrack() {
        let mut solver = solver_with(4, &[&[-1, 2], &[-2, 3], &[-1, -3, 4]], DEFAULT_OPTIONS);
        solver.assignment.new_decision_level();
        solver.assignment.unchecked_enqueue(Lit::from_external(1), None);
        assert_eq!(solver.propagate(), None);
        assert_eq!(solver.num_assigns(), 4);
        assert_eq!(solver.value(Lit::from_external(4)), LBool::True);
        assert_eq!(solver.assignment.level(Var::new(3)), 1);
        assert!(solver.assignment.reason(Var::new(3)).is_some());
        check_watch_invariant(&solver);

        solver.backtrack(0);
        assert_eq!(solver.num_assigns(), 0);
        for v in 0..4 {
            assert_eq!(solver.value_var(Var::new(v)), LBool::Undef);
        }
        assert_eq!(solver.assignment.qhead, 0);
        check_watch_invariant(&solver);
    }

    #[test]
    fn test_conflict_detection() {
        let mut solver = solver_with(3, &[&[-1, 2], &[-1, 3], &[-2, -3]], DEFAULT_OPTIONS);
        solver.assignment.new_decision_level();
        solver.assignment.unchecked_enqueue(Lit::from_external(1), None);
        let conflict = solver.propagate().expect("must conflict");
        let clause = solver.ca.clause(conflict);
        assert!(clause.lits().all(|lit| solver.value(lit) == LBool::False));
        assert_eq!(solver.assignment.qhead, solver.assignment.trail.len());
        check_watch_invariant(&solver);
    }

    #[test]
    fn test_pigeonhole_unsat() {
        for n in 2..=4 {
            let php = pigeonhole(n);
            let refs: Vec<&[i32]> = php.iter().map(|c| c.as_slice()).collect();
            let mut solver = solver_with(((n + 1) * n) as usize, &refs, DEFAULT_OPTIONS);
            assert_eq!(solver.solve().unwrap(), SolveResult::Unsat, "PHP({}, {})", n + 1, n);
            assert!(solver.num_conflicts() > 0);
        }
    }

    #[test]
    fn test_model_satisfies_clauses() {
        let clauses: &[&[i32]] = &[&[1, 2, 3], &[-1, -2], &[-2, -3], &[-1, -3], &[2, 4], &[-4, 5], &[-5, -1]];
        for mode in [CcminMode::None, CcminMode::Shallow, CcminMode::Deep] {
            let options = Options {
                ccmin_mode: mode,
                ..DEFAULT_OPTIONS
            };
            let mut solver = solver_with(5, clauses, options);
            assert_eq!(solver.solve().unwrap(), SolveResult::Sat);
            for clause in clauses {
                assert!(clause.iter().any(|&x| solver.model_value(Lit::from_external(x)) == LBool::True));
            }
            // solving is repeatable
            assert_eq!(solver.solve().unwrap(), SolveResult::Sat);
        }
    }

    #[test]
    fn test_assumptions_and_failed_subset() {
        let mut solver = solver_with(4, &[&[1, 2], &[3, 4], &[-1, -2], &[-3, -4]], DEFAULT_OPTIONS);
        let (a, b, c) = (Lit::from_external(1), Lit::from_external(2), Lit::from_external(3));

        assert_eq!(solver.solve_under_assumptions(&[a, c, b]).unwrap(), SolveResult::Unsat);
        let failed = solver.failed_assumptions();
        assert!(failed.contains(&b));
        assert!(failed.contains(&a));
        assert!(!failed.contains(&c));
        assert!(solver.failed(a));
        assert!(solver.okay());

        assert_eq!(solver.solve_under_assumptions(&[a, c]).unwrap(), SolveResult::Sat);
        assert_eq!(solver.model_value(a), LBool::True);
        assert_eq!(solver.model_value(b), LBool::False);
        assert!(solver.failed_assumptions().is_empty());
    }

    #[test]
    fn test_assumption_against_root_unit() {
        let mut solver = solver_with(2, &[&[-1], &[1, 2]], DEFAULT_OPTIONS);
        let x = Lit::from_external(1);
        assert_eq!(solver.solve_under_assumptions(&[x]).unwrap(), SolveResult::Unsat);
        assert_eq!(solver.failed_assumptions(), vec![x]);
        assert!(solver.okay());
        assert_eq!(solver.solve().unwrap(), SolveResult::Sat);
    }

    #[test]
    fn test_conflict_budget_gives_unknown() {
        let php = pigeonhole(7);
        let refs: Vec<&[i32]> = php.iter().map(|c| c.as_slice()).collect();
        let mut solver = solver_with(56, &refs, DEFAULT_OPTIONS);
        solver.set_conflict_budget(10);
        assert_eq!(solver.solve().unwrap(), SolveResult::Unknown);
        assert!(solver.num_conflicts() >= 10);
        assert_eq!(solver.assignment.decision_level(), 0);
        assert!(solver.okay());

        // interrupted solver refuses to continue until cleared
        solver.budget_off();
        solver.interrupt();
        assert_eq!(solver.solve().unwrap(), SolveResult::Unknown);
        solver.clear_interrupt();
        solver.set_conflict_budget(5);
        assert_eq!(solver.solve().unwrap(), SolveResult::Unknown);
    }

    #[test]
    fn test_budget_is_polled_after_every_conflict() {
        let php = pigeonhole(7);
        let refs: Vec<&[i32]> = php.iter().map(|c| c.as_slice()).collect();
        let mut solver = solver_with(56, &refs, DEFAULT_OPTIONS);
        solver.set_conflict_budget(7);
        assert_eq!(solver.solve().unwrap(), SolveResult::Unknown);
        assert_eq!(solver.num_conflicts(), 7);
        assert_eq!(solver.assignment.decision_level(), 0);

        solver.set_conflict_budget(1);
        assert_eq!(solver.solve().unwrap(), SolveResult::Unknown);
        assert_eq!(solver.num_conflicts(), 8);
    }

    #[test]
    fn test_aggressive_restarts_and_reductions_agree() {
        let php = pigeonhole(5);
        let refs: Vec<&[i32]> = php.iter().map(|c| c.as_slice()).collect();
        let aggressive = Options {
            restart: RestartKind::Geometric,
            restart_init: 1,
            restart_inc: 1.0,
            learntsize_factor: 0.01,
            learntsize_adjust_start: 1.0,
            garbage_frac: 0.01,
            ..DEFAULT_OPTIONS
        };
        let relaxed = Options {
            restart: RestartKind::Never,
            reduce_db: false,
            garbage_frac: 1.0,
            ..DEFAULT_OPTIONS
        };
        let mut a = solver_with(30, &refs, aggressive);
        let mut b = solver_with(30, &refs, relaxed);
        assert_eq!(a.solve().unwrap(), SolveResult::Unsat);
        assert_eq!(b.solve().unwrap(), SolveResult::Unsat);
        assert!(a.num_restarts() > b.num_restarts());
        assert_eq!(b.num_reduces(), 0);
        assert_eq!(b.stats().garbage_collections, 0);
    }

    #[test]
    fn test_reset_keeps_interrupt() {
        let mut solver = solver_with(2, &[&[1, 2]], DEFAULT_OPTIONS);
        let handle = solver.interrupt_handle();
        solver.reset();
        assert_eq!(solver.num_vars(), 0);
        handle.interrupt();
        solver.new_var();
        assert_eq!(solver.solve().unwrap(), SolveResult::Unknown);
    }

    #[test]
    fn test_out_of_memory_is_an_error() {
        let mut solver = Solver::default().with_arena_limit(16);
        for _ in 0..10 {
            solver.new_var();
        }
        assert!(solver.add_clause(&lits(&[1, 2, 3, 4, 5])).is_ok());
        assert!(solver.add_clause(&lits(&[6, 7, 8, 9, 10])).is_ok());
        let err = solver.add_clause(&lits(&[-1, -2, -3, -4, -5])).unwrap_err();
        assert!(matches!(err, crate::error::SolverError::OutOfMemory { .. }));
    }
}
