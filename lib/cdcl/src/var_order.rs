use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::assignment::Assignment;
use crate::idx::{VarHeap, VarVec};
use crate::lit::Lit;
use crate::options::Options;
use crate::stats::Statistics;
use crate::var::Var;

/// VSIDS activities, the decision heap and the polarity policy.
#[derive(Debug)]
pub struct VarOrder {
    pub(crate) activity: VarVec<f64>,
    order_heap: VarHeap,
    var_decay: f64,
    var_inc: f64,
    /// Saved phase: `true` if the variable was last assigned negatively.
    polarity: VarVec<bool>,
    /// User preference: `Some(true)` to branch positively first.
    user_pol: VarVec<Option<bool>>,
    decision: VarVec<bool>,
    random_var_freq: f64,
    rnd_pol: bool,
    rnd_init_act: bool,
    rng: StdRng,
}

impl VarOrder {
    pub fn new(options: &Options) -> Self {
        Self {
            activity: VarVec::new(),
            order_heap: VarHeap::new(),
            var_decay: options.var_decay,
            var_inc: 1.0,
            polarity: VarVec::new(),
            user_pol: VarVec::new(),
            decision: VarVec::new(),
            random_var_freq: options.random_var_freq,
            rnd_pol: options.rnd_pol,
            rnd_init_act: options.rnd_init_act,
            rng: StdRng::seed_from_u64(options.random_seed),
        }
    }
}

impl VarOrder {
    pub fn init_var(&mut self, var: Var, user_pol: Option<bool>, decision: bool) {
        let act = if self.rnd_init_act {
            self.rng.gen::<f64>() * 0.00001
        } else {
            0.0
        };
        self.activity.init(&var);
        self.activity[var] = act;
        self.polarity.init_by(&var, || true);
        self.user_pol.init(&var);
        self.user_pol[var] = user_pol;
        self.decision.init(&var);
        self.set_decision(var, decision);
    }

    pub fn is_decision(&self, var: Var) -> bool {
        self.decision[var]
    }

    pub fn set_decision(&mut self, var: Var, decision: bool) {
        self.decision[var] = decision;
        if decision {
            self.insert_var_order(var);
        }
    }

    pub fn set_user_polarity(&mut self, var: Var, user_pol: Option<bool>) {
        self.user_pol[var] = user_pol;
    }

    pub fn save_phase(&mut self, lit: Lit) {
        self.polarity[lit.var()] = lit.negated();
    }

    pub fn num_decision_vars(&self) -> usize {
        self.decision.iter().filter(|&&d| d).count()
    }

    pub fn var_decay_activity(&mut self) {
        self.var_inc /= self.var_decay;
    }

    pub fn var_bump_activity(&mut self, var: Var) {
        let new = self.activity[var] + self.var_inc;
        self.activity[var] = new;

        // Rescale large activities, if necessary:
        if new > 1e100 {
            self.var_rescale_activity();
        }

        // Update `var` in heap:
        if self.order_heap.contains(&var) {
            let act = &self.activity;
            self.order_heap.decrease_by(var, |&a, &b| act[a] > act[b]);
        }
    }

    fn var_rescale_activity(&mut self) {
        debug!("Rescaling activity");
        for a in self.activity.iter_mut() {
            *a *= 1e-100;
        }
        self.var_inc *= 1e-100;
    }

    pub fn insert_var_order(&mut self, var: Var) {
        if self.decision[var] && !self.order_heap.contains(&var) {
            let act = &self.activity;
            self.order_heap.insert_by(var, |&a, &b| act[a] > act[b]);
        }
    }

    /// Rebuild the heap from the unassigned decision variables.
    pub fn rebuild_order_heap(&mut self, assignment: &Assignment) {
        let vars = (0..assignment.num_vars() as u32)
            .map(Var::new)
            .filter(|&v| self.decision[v] && assignment.value_var(v).is_undef())
            .collect();
        let act = &self.activity;
        self.order_heap.rebuild_by(vars, |&a, &b| act[a] > act[b]);
    }

    pub fn pick_branching_literal(&mut self, assignment: &Assignment, stats: &mut Statistics) -> Option<Lit> {
        let mut next = None;

        // Random decision:
        if self.random_var_freq > 0.0 && !self.order_heap.is_empty() && self.rng.gen::<f64>() < self.random_var_freq {
            let var = self.order_heap[self.rng.gen_range(0..self.order_heap.len())];
            if assignment.value_var(var).is_undef() && self.decision[var] {
                stats.rnd_decisions += 1;
                next = Some(var);
            }
        }

        // Activity based decision:
        let var = loop {
            match next {
                Some(var) if assignment.value_var(var).is_undef() && self.decision[var] => break var,
                _ => {
                    let act = &self.activity;
                    next = Some(self.order_heap.pop_by(|&a, &b| act[a] > act[b])?);
                }
            }
        };

        let negated = match self.user_pol[var] {
            Some(positive) => !positive,
            None if self.rnd_pol => self.rng.gen_bool(0.5),
            None => self.polarity[var],
        };
        Some(Lit::new(var, negated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_OPTIONS;

    fn setup(n: u32) -> (VarOrder, Assignment) {
        let mut order = VarOrder::new(&DEFAULT_OPTIONS);
        let mut assignment = Assignment::new();
        for v in 0..n {
            assignment.init(Var::new(v));
            order.init_var(Var::new(v), None, true);
        }
        (order, assignment)
    }

    #[test]
    fn test_picks_most_active_unassigned() {
        let (mut order, mut assignment) = setup(4);
        let mut stats = Statistics::default();
        order.var_bump_activity(Var::new(2));
        order.var_decay_activity();
        order.var_bump_activity(Var::new(1));
        order.var_bump_activity(Var::new(1));

        // default phase is negative
        assert_eq!(order.pick_branching_literal(&assignment, &mut stats), Some(Lit::from_external(-2)));

        assignment.unchecked_enqueue(Lit::from_external(3), None);
        let next = order.pick_branching_literal(&assignment, &mut stats).unwrap();
        assert_ne!(next.var(), Var::new(2), "assigned variables are skipped");
        assert_eq!(stats.rnd_decisions, 0);
    }

    #[test]
    fn test_rescale_keeps_relative_order() {
        let (mut order, assignment) = setup(3);
        let mut stats = Statistics::default();
        order.var_bump_activity(Var::new(2));
        order.var_inc = 2e100;
        order.var_bump_activity(Var::new(0));

        // everything, including the increment, is scaled down by 1e100
        assert!((order.activity[Var::new(0)] - 2.0).abs() < 1e-9);
        assert!((order.activity[Var::new(2)] - 1e-100).abs() < 1e-110);
        assert!((order.var_inc - 2.0).abs() < 1e-9);

        order.var_bump_activity(Var::new(1));
        order.var_bump_activity(Var::new(1));
        let picked: Vec<Var> = std::iter::from_fn(|| order.pick_branching_literal(&assignment, &mut stats))
            .map(|lit| lit.var())
            .collect();
        assert_eq!(picked, vec![Var::new(1), Var::new(0), Var::new(2)]);
    }

    #[test]
    fn test_polarity_policy() {
        let (mut order, assignment) = setup(2);
        let mut stats = Statistics::default();
        order.set_user_polarity(Var::new(0), Some(true));
        order.save_phase(Lit::from_external(2));
        order.var_bump_activity(Var::new(0));

        assert_eq!(order.pick_branching_literal(&assignment, &mut stats), Some(Lit::from_external(1)));
        assert_eq!(order.pick_branching_literal(&assignment, &mut stats), Some(Lit::from_external(2)));
        assert_eq!(order.pick_branching_literal(&assignment, &mut stats), None);
    }

    #[test]
    fn test_non_decision_vars_are_never_picked() {
        let (mut order, assignment) = setup(3);
        let mut stats = Statistics::default();
        order.set_decision(Var::new(1), false);
        assert_eq!(order.num_decision_vars(), 2);

        let mut picked = Vec::new();
        while let Some(lit) = order.pick_branching_literal(&assignment, &mut stats) {
            picked.push(lit.var());
        }
        picked.sort();
        assert_eq!(picked, vec![Var::new(0), Var::new(2)]);

        order.rebuild_order_heap(&assignment);
        assert!(order.pick_branching_literal(&assignment, &mut stats).is_some());
    }

    #[test]
    fn test_random_decisions_are_counted() {
        let options = Options {
            random_var_freq: 1.0,
            ..DEFAULT_OPTIONS
        };
        let mut order = VarOrder::new(&options);
        let mut assignment = Assignment::new();
        for v in 0..5 {
            assignment.init(Var::new(v));
            order.init_var(Var::new(v), None, true);
        }
        let mut stats = Statistics::default();
        assert!(order.pick_branching_literal(&assignment, &mut stats).is_some());
        assert_eq!(stats.rnd_decisions, 1);
    }
}
