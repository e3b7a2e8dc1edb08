use tracing::debug;

use crate::options::Options;

#[derive(Debug, Clone)]
pub struct LearningStrategy {
    pub min_learnts_lim: usize,
    pub learntsize_factor: f64,
    pub learntsize_inc: f64,
    pub learntsize_adjust_start: f64,
    pub learntsize_adjust_inc: f64,
}

impl LearningStrategy {
    pub fn from_options(options: &Options) -> Self {
        Self {
            min_learnts_lim: options.min_learnts_lim,
            learntsize_factor: options.learntsize_factor,
            learntsize_inc: options.learntsize_inc,
            learntsize_adjust_start: options.learntsize_adjust_start,
            learntsize_adjust_inc: options.learntsize_adjust_inc,
        }
    }
}

/// Limit on the number of learnt clauses, growing on a conflict schedule.
#[derive(Debug, Clone)]
pub struct LearningGuard {
    pub strategy: LearningStrategy,
    max_learnts: f64,
    learntsize_adjust_confl: f64,
    learntsize_adjust_cnt: u64,
}

impl LearningGuard {
    pub fn new(strategy: LearningStrategy) -> Self {
        Self {
            strategy,
            max_learnts: 0.0,
            learntsize_adjust_confl: 0.0,
            learntsize_adjust_cnt: 0,
        }
    }

    pub fn max_learnts(&self) -> f64 {
        self.max_learnts
    }

    /// Whether the learnt clause database must be reduced.
    pub fn should_reduce(&self, num_learnts: usize, num_assigns: usize) -> bool {
        num_learnts as f64 - num_assigns as f64 >= self.max_learnts
    }

    pub fn reset(&mut self, num_clauses: usize) {
        self.max_learnts =
            (num_clauses as f64 * self.strategy.learntsize_factor).max(self.strategy.min_learnts_lim as f64);
        self.learntsize_adjust_confl = self.strategy.learntsize_adjust_start;
        self.learntsize_adjust_cnt = self.learntsize_adjust_confl as _;
    }

    /// Count a conflict. Returns `true` when the limit has just been raised.
    pub fn bump(&mut self) -> bool {
        self.learntsize_adjust_cnt = self.learntsize_adjust_cnt.saturating_sub(1);
        if self.learntsize_adjust_cnt == 0 {
            self.max_learnts *= self.strategy.learntsize_inc;
            self.learntsize_adjust_confl *= self.strategy.learntsize_adjust_inc;
            self.learntsize_adjust_cnt = self.learntsize_adjust_confl as _;
            debug!(
                "New max_learnts = {}, learntsize_adjust_cnt = {}",
                self.max_learnts as u64, self.learntsize_adjust_cnt
            );
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_OPTIONS;

    #[test]
    fn test_guard_schedule() {
        let mut guard = LearningGuard::new(LearningStrategy::from_options(&DEFAULT_OPTIONS));
        guard.reset(300);
        assert!((guard.max_learnts() - 100.0).abs() < 1e-9);
        assert!(!guard.should_reduce(150, 60));
        assert!(guard.should_reduce(160, 60));

        let bumps = (0..100).filter(|_| guard.bump()).count();
        assert_eq!(bumps, 1);
        assert!((guard.max_learnts() - 110.0).abs() < 1e-9);
        // next adjustment comes after 150 more conflicts
        assert_eq!((0..149).filter(|_| guard.bump()).count(), 0);
        assert!(guard.bump());
    }

    #[test]
    fn test_min_learnts_lim() {
        let strategy = LearningStrategy {
            min_learnts_lim: 5000,
            ..LearningStrategy::from_options(&DEFAULT_OPTIONS)
        };
        let mut guard = LearningGuard::new(strategy);
        guard.reset(30);
        assert_eq!(guard.max_learnts() as usize, 5000);
    }
}
