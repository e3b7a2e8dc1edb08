use snafu::ensure;

use crate::error::{InvalidOptionSnafu, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RestartKind {
    /// Conflict limits follow the Luby sequence.
    Luby,
    /// Conflict limits grow geometrically.
    Geometric,
    /// Never restart.
    Never,
}

/// Conflict clause minimization.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CcminMode {
    None,
    /// One-hop check of the reason of each literal.
    Shallow,
    /// Recursive check through the implication graph.
    Deep,
}

/// Which unassigned variables remember their last polarity.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PhaseSaving {
    None,
    /// Only the variables unassigned from the deepest decision level.
    Limited,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    // Heuristic:
    pub var_decay: f64,
    pub clause_decay: f64,
    pub random_var_freq: f64,
    pub random_seed: u64,
    pub ccmin_mode: CcminMode,
    pub phase_saving: PhaseSaving,
    pub rnd_init_act: bool,
    pub rnd_pol: bool,
    // Restart:
    pub restart: RestartKind,
    pub restart_init: usize,
    pub restart_inc: f64,
    // ReduceDB:
    pub garbage_frac: f64,
    pub min_learnts_lim: usize,
    pub learntsize_factor: f64,
    pub learntsize_inc: f64,
    pub learntsize_adjust_start: f64,
    pub learntsize_adjust_inc: f64,
    pub remove_satisfied: bool,
    pub reduce_db: bool,
}

pub const DEFAULT_OPTIONS: Options = Options {
    // Heuristic:
    var_decay: 0.95,
    clause_decay: 0.999,
    random_var_freq: 0.0,
    random_seed: 91648253,
    ccmin_mode: CcminMode::Deep,
    phase_saving: PhaseSaving::Full,
    rnd_init_act: false,
    rnd_pol: false,
    // Restart:
    restart: RestartKind::Luby,
    restart_init: 100,
    restart_inc: 2.0,
    // ReduceDB:
    garbage_frac: 0.20,
    min_learnts_lim: 0,
    learntsize_factor: 1.0 / 3.0,
    learntsize_inc: 1.1,
    learntsize_adjust_start: 100.0,
    learntsize_adjust_inc: 1.5,
    remove_satisfied: true,
    reduce_db: true,
};

impl Default for Options {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}

impl Options {
    /// Check that every numeric option lies in its admissible range.
    pub fn validate(&self) -> Result<()> {
        fn open_unit(name: &'static str, x: f64) -> Result<()> {
            ensure!(
                x > 0.0 && x < 1.0,
                InvalidOptionSnafu {
                    name,
                    reason: format!("{} is not in (0, 1)", x)
                }
            );
            Ok(())
        }

        open_unit("var-decay", self.var_decay)?;
        open_unit("cla-decay", self.clause_decay)?;
        ensure!(
            (0.0..=1.0).contains(&self.random_var_freq),
            InvalidOptionSnafu {
                name: "rnd-freq",
                reason: format!("{} is not in [0, 1]", self.random_var_freq)
            }
        );
        ensure!(
            self.restart_init >= 1,
            InvalidOptionSnafu {
                name: "rfirst",
                reason: "must be at least 1"
            }
        );
        ensure!(
            self.restart_inc >= 1.0,
            InvalidOptionSnafu {
                name: "rinc",
                reason: format!("{} is less than 1", self.restart_inc)
            }
        );
        ensure!(
            self.garbage_frac > 0.0,
            InvalidOptionSnafu {
                name: "gc-frac",
                reason: format!("{} is not positive", self.garbage_frac)
            }
        );
        ensure!(
            self.learntsize_factor > 0.0,
            InvalidOptionSnafu {
                name: "learntsize-factor",
                reason: format!("{} is not positive", self.learntsize_factor)
            }
        );
        ensure!(
            self.learntsize_inc >= 1.0 && self.learntsize_adjust_inc >= 1.0,
            InvalidOptionSnafu {
                name: "learntsize-inc",
                reason: "growth factors must be at least 1"
            }
        );
        ensure!(
            self.learntsize_adjust_start >= 1.0,
            InvalidOptionSnafu {
                name: "learntsize-adjust-start",
                reason: format!("{} is less than 1", self.learntsize_adjust_start)
            }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;

    #[test]
    fn test_default_options_are_valid() {
        assert!(Options::default().validate().is_ok());
        assert_eq!(Options::default(), DEFAULT_OPTIONS);
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let bad = Options {
            var_decay: 1.0,
            ..DEFAULT_OPTIONS
        };
        assert!(matches!(bad.validate(), Err(SolverError::InvalidOption { name: "var-decay", .. })));

        let bad = Options {
            random_var_freq: 1.5,
            ..DEFAULT_OPTIONS
        };
        assert!(bad.validate().is_err());

        let bad = Options {
            restart_inc: 0.5,
            ..DEFAULT_OPTIONS
        };
        assert!(bad.validate().is_err());
    }
}
