use std::cmp::Ordering;

use tracing::debug;

use crate::clause::Clause;
use crate::clause_allocator::ClauseAllocator;
use crate::cref::ClauseRef;
use crate::options::Options;

/// Original and learnt clause lists, with the clause activity increment.
#[derive(Debug)]
pub struct ClauseDatabase {
    /// Original clauses.
    pub(crate) clauses: Vec<ClauseRef>,
    /// Learnt clauses.
    pub(crate) learnts: Vec<ClauseRef>,
    // Clause activity:
    cla_decay: f64,
    pub(crate) cla_inc: f64,
}

impl ClauseDatabase {
    pub fn new(options: &Options) -> Self {
        Self {
            clauses: Vec::new(),
            learnts: Vec::new(),
            cla_decay: options.clause_decay,
            cla_inc: 1.0,
        }
    }
}

impl ClauseDatabase {
    pub fn clauses(&self) -> &[ClauseRef] {
        &self.clauses
    }
    pub fn learnts(&self) -> &[ClauseRef] {
        &self.learnts
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
    pub fn num_learnts(&self) -> usize {
        self.learnts.len()
    }

    pub fn cla_decay_activity(&mut self) {
        self.cla_inc *= 1.0 / self.cla_decay;
    }

    pub fn cla_bump_activity(&mut self, cref: ClauseRef, ca: &mut ClauseAllocator) {
        let activity = ca.clause(cref).activity() as f64 + self.cla_inc;
        ca.clause_mut(cref).set_activity(activity as f32);

        // Rescale:
        if activity > 1e20 {
            debug!("Rescaling clause activity");
            // Decrease the increment value:
            self.cla_inc *= 1e-20;

            // Decrease all activities:
            for &cref in self.learnts.iter() {
                let scaled = ca.clause(cref).activity() * 1e-20;
                ca.clause_mut(cref).set_activity(scaled);
            }
        }
    }

    /// Order learnt clauses from the most to the least removable:
    /// binary clauses go last, the others by ascending activity, larger clauses first on ties.
    pub fn sort_learnts_for_reduce(&mut self, ca: &ClauseAllocator) {
        self.learnts
            .sort_by(|&a, &b| reduce_order(&ca.clause(a), &ca.clause(b)));
    }
}

fn reduce_order(x: &Clause, y: &Clause) -> Ordering {
    match (x.len() == 2, y.len() == 2) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x
            .activity()
            .total_cmp(&y.activity())
            .then_with(|| y.len().cmp(&x.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Lit;
    use crate::options::DEFAULT_OPTIONS;

    fn alloc(ca: &mut ClauseAllocator, xs: &[i32], activity: f32) -> ClauseRef {
        let lits: Vec<Lit> = xs.iter().map(|&x| Lit::from_external(x)).collect();
        let cref = ca.alloc(&lits, true).unwrap();
        ca.clause_mut(cref).set_activity(activity);
        cref
    }

    #[test]
    fn test_reduce_order() {
        let mut ca = ClauseAllocator::new();
        let mut db = ClauseDatabase::new(&DEFAULT_OPTIONS);
        let binary = alloc(&mut ca, &[1, 2], 0.0);
        let hot = alloc(&mut ca, &[1, 2, 3], 9.0);
        let cold_small = alloc(&mut ca, &[1, 2, 3], 1.0);
        let cold_large = alloc(&mut ca, &[1, 2, 3, 4, 5], 1.0);
        db.learnts = vec![binary, hot, cold_small, cold_large];

        db.sort_learnts_for_reduce(&ca);
        assert_eq!(db.learnts(), &[cold_large, cold_small, hot, binary]);
    }

    #[test]
    fn test_bump_and_rescale() {
        let mut ca = ClauseAllocator::new();
        let mut db = ClauseDatabase::new(&DEFAULT_OPTIONS);
        let a = alloc(&mut ca, &[1, 2, 3], 0.0);
        let b = alloc(&mut ca, &[-1, 2, 3], 0.0);
        db.learnts = vec![a, b];

        db.cla_bump_activity(a, &mut ca);
        assert_eq!(ca.clause(a).activity(), 1.0);
        db.cla_decay_activity();
        assert!(db.cla_inc > 1.0);

        db.cla_inc = 1e21;
        db.cla_bump_activity(b, &mut ca);
        assert!(ca.clause(b).activity() < 1e2);
        assert!(ca.clause(a).activity() < 1e-10);
        assert!(db.cla_inc < 1e2);
    }
}
