use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cloneable cancellation token.
///
/// Any clone may be moved to another thread (or a signal handler) and used to ask a
/// running `solve` to stop. The solver polls the token between search steps and
/// returns `Unknown`, leaving itself reusable.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Resource limits of a solve call.
///
/// Conflict and propagation budgets are absolute counter values, set relative to the
/// counters at the time they are configured.
#[derive(Debug, Clone, Default)]
pub struct Budget {
    conflict_budget: Option<u64>,
    propagation_budget: Option<u64>,
    deadline: Option<Instant>,
    interrupt: Interrupt,
}

impl Budget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlimited budget sharing an existing interrupt token.
    pub fn with_interrupt(interrupt: Interrupt) -> Self {
        Self {
            interrupt,
            ..Self::default()
        }
    }

    pub fn set_conflict_budget(&mut self, conflicts_now: u64, x: u64) {
        self.conflict_budget = Some(conflicts_now.saturating_add(x));
    }

    pub fn set_propagation_budget(&mut self, propagations_now: u64, x: u64) {
        self.propagation_budget = Some(propagations_now.saturating_add(x));
    }

    pub fn set_time_budget(&mut self, timeout: Duration) {
        self.deadline = Instant::now().checked_add(timeout);
    }

    pub fn budget_off(&mut self) {
        self.conflict_budget = None;
        self.propagation_budget = None;
        self.deadline = None;
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    pub fn within(&self, conflicts: u64, propagations: u64) -> bool {
        !self.interrupt.is_interrupted()
            && self.conflict_budget.map_or(true, |b| conflicts < b)
            && self.propagation_budget.map_or(true, |b| propagations < b)
            && self.deadline.map_or(true, |d| Instant::now() < d)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_conflict_and_propagation_budgets() {
        let mut budget = Budget::new();
        assert!(budget.within(1_000_000, 1_000_000));

        budget.set_conflict_budget(10, 5);
        assert!(budget.within(14, 0));
        assert!(!budget.within(15, 0));

        budget.set_propagation_budget(0, 100);
        assert!(!budget.within(0, 100));

        budget.budget_off();
        assert!(budget.within(15, 100));
    }

    #[test]
    fn test_time_budget() {
        let mut budget = Budget::new();
        budget.set_time_budget(Duration::ZERO);
        assert!(!budget.within(0, 0));
        budget.set_time_budget(Duration::from_secs(3600));
        assert!(budget.within(0, 0));
    }

    #[test]
    fn test_interrupt_from_another_thread() {
        let budget = Budget::new();
        let handle = budget.interrupt().clone();
        thread::spawn(move || handle.interrupt()).join().unwrap();
        assert!(!budget.within(0, 0));
        budget.interrupt().clear();
        assert!(budget.within(0, 0));
    }
}
