use std::time::Duration;

/// Search counters and timings, accumulated over all `solve` calls.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub solves: u64,
    pub restarts: u64,
    pub decisions: u64,
    pub rnd_decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub reduces: u64,
    pub garbage_collections: u64,
    /// Literals in learnt clauses before minimization.
    pub max_literals: u64,
    /// Literals in learnt clauses after minimization.
    pub tot_literals: u64,
    pub clauses_literals: u64,
    pub learnts_literals: u64,
    /// Words currently used by the clause arena.
    pub arena_words: usize,
    /// Largest arena size reached so far.
    pub arena_peak_words: usize,
    pub time_search: Duration,
    pub time_propagate: Duration,
    pub time_analyze: Duration,
    pub time_reduce: Duration,
    pub time_gc: Duration,
}

impl Statistics {
    /// Percentage of literals removed by conflict clause minimization.
    pub fn minimized_percent(&self) -> f64 {
        if self.max_literals == 0 {
            0.0
        } else {
            100.0 * (self.max_literals - self.tot_literals) as f64 / self.max_literals as f64
        }
    }
}
