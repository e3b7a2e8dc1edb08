use std::time::Instant;

use tracing::debug;

use crate::clause_allocator::ClauseAllocator;
use crate::cref::ClauseRef;
use crate::error::Result;
use crate::lbool::LBool;

use super::Solver;

impl Solver {
    /// Simplify the clause database according to the current top-level assignment.
    ///
    /// Removes satisfied learnt clauses (and satisfied problem clauses, if enabled)
    /// and strips root-false literals from the remaining ones. Returns `Ok(false)` if
    /// the clause set is unsatisfiable.
    pub fn simplify(&mut self) -> Result<bool> {
        assert_eq!(self.assignment.decision_level(), 0);

        if !self.ok || self.propagate().is_some() {
            self.ok = false;
            return Ok(false);
        }

        if Some(self.num_assigns()) == self.simp_db_assigns || self.simp_db_props > 0 {
            return Ok(true);
        }

        // Remove satisfied clauses:
        self.remove_satisfied(true);
        if self.options.remove_satisfied {
            self.remove_satisfied(false);
        }
        self.check_garbage()?;
        self.var_order.rebuild_order_heap(&self.assignment);

        self.simp_db_assigns = Some(self.num_assigns());
        self.simp_db_props = (self.stats.clauses_literals + self.stats.learnts_literals) as i64;

        Ok(true)
    }

    fn remove_satisfied(&mut self, learnts: bool) {
        let mut list = if learnts {
            std::mem::take(&mut self.db.learnts)
        } else {
            std::mem::take(&mut self.db.clauses)
        };
        let before = list.len();

        list.retain(|&cref| {
            if self.satisfied(cref) {
                self.remove_clause(cref);
                false
            } else {
                self.strip_false_literals(cref);
                true
            }
        });
        debug!(
            "Removed {} satisfied {} of {}",
            before - list.len(),
            if learnts { "learnts" } else { "clauses" },
            before
        );

        if learnts {
            self.db.learnts = list;
        } else {
            self.db.clauses = list;
        }
    }

    /// Drop root-false literals beyond the two watched ones.
    fn strip_false_literals(&mut self, cref: ClauseRef) {
        let mut clause = self.ca.clause_mut(cref);
        debug_assert!(self.assignment.value(clause.lit(0)).is_undef());
        debug_assert!(self.assignment.value(clause.lit(1)).is_undef());

        let old_size = clause.len();
        let mut size = old_size;
        let mut k = 2;
        while k < size {
            if self.assignment.value(clause.lit(k)) == LBool::False {
                size -= 1;
                let last = clause.lit(size);
                clause.set_lit(k, last);
            } else {
                k += 1;
            }
        }
        let learnt = clause.as_ref().is_learnt();

        if size < old_size {
            self.ca.shrink(cref, size);
            let removed = (old_size - size) as u64;
            if learnt {
                self.stats.learnts_literals -= removed;
            } else {
                self.stats.clauses_literals -= removed;
            }
        }
    }

    /// Remove half of the learnt clauses, minus the clauses locked by the current assignment.
    ///
    /// Binary clauses are never removed, and clauses whose activity is below
    /// `cla_inc / num_learnts` are removed regardless of their rank.
    pub(super) fn reduce_db(&mut self) -> Result<()> {
        let time_reduce_start = Instant::now();
        let extra_lim = self.db.cla_inc / self.num_learnts() as f64;

        self.db.sort_learnts_for_reduce(&self.ca);
        let learnts = std::mem::take(&mut self.db.learnts);
        let index_lim = learnts.len() / 2;
        let before = learnts.len();

        let mut kept = Vec::with_capacity(before);
        for (i, cref) in learnts.into_iter().enumerate() {
            let clause = self.ca.clause(cref);
            let remove = clause.len() > 2
                && !self.locked(cref)
                && (i < index_lim || (clause.activity() as f64) < extra_lim);
            if remove {
                self.remove_clause(cref);
            } else {
                kept.push(cref);
            }
        }
        debug!("reduce_db: kept {} of {} learnts", kept.len(), before);
        self.db.learnts = kept;
        self.stats.reduces += 1;

        self.check_garbage()?;
        self.stats.time_reduce += time_reduce_start.elapsed();
        Ok(())
    }

    fn check_garbage(&mut self) -> Result<()> {
        if self.ca.wasted() as f64 > self.ca.len() as f64 * self.options.garbage_frac {
            self.garbage_collect()?;
        }
        Ok(())
    }

    /// Compact the clause arena, rewriting every reference held by the solver.
    ///
    /// The new arena is reserved up front for all live words, so an allocation
    /// failure leaves the solver untouched.
    pub(super) fn garbage_collect(&mut self) -> Result<()> {
        let time_gc_start = Instant::now();
        let mut to = self.ca.fresh_with_capacity(self.ca.len() - self.ca.wasted())?;
        self.reloc_all(&mut to)?;
        debug!(
            "Garbage collection: {} words => {} words",
            self.ca.len(),
            to.len()
        );
        self.ca.replace_with(to);
        self.stats.garbage_collections += 1;
        self.stats.time_gc += time_gc_start.elapsed();
        Ok(())
    }

    fn reloc_all(&mut self, to: &mut ClauseAllocator) -> Result<()> {
        // All watchers:
        self.watches.clean_all(&self.ca);
        for ws in self.watches.iter_mut() {
            for w in ws.iter_mut() {
                self.ca.reloc(&mut w.cref, to)?;
            }
        }

        // All reasons:
        for i in 0..self.assignment.trail.len() {
            let var = self.assignment.trail[i].var();
            if let Some(mut reason) = self.assignment.reason(var) {
                // Reasons of level-0 literals may point to removed clauses; those are dropped.
                if self.ca.is_reloced(reason) || self.locked(reason) {
                    self.ca.reloc(&mut reason, to)?;
                    self.assignment.var_data[var].reason = Some(reason);
                } else {
                    self.assignment.var_data[var].reason = None;
                }
            }
        }

        // All learnt and original clauses:
        let ca = &mut self.ca;
        for list in [&mut self.db.learnts, &mut self.db.clauses] {
            let mut j = 0;
            for i in 0..list.len() {
                let mut cref = list[i];
                if !ca.header(cref).is_deleted() {
                    ca.reloc(&mut cref, to)?;
                    list[j] = cref;
                    j += 1;
                }
            }
            list.truncate(j);
        }

        Ok(())
    }
}
