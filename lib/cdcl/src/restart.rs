use crate::options::{Options, RestartKind};
use crate::utils::luby;

#[derive(Debug, Clone)]
pub struct RestartStrategy {
    pub kind: RestartKind,
    pub restart_init: usize,
    pub restart_inc: f64,
}

impl RestartStrategy {
    pub fn from_options(options: &Options) -> Self {
        Self {
            kind: options.restart,
            restart_init: options.restart_init,
            restart_inc: options.restart_inc,
        }
    }

    /// Conflict allowance of the given restart round, `None` meaning unlimited.
    pub fn num_confl(&self, restarts: usize) -> Option<usize> {
        let restart_base = match self.kind {
            RestartKind::Luby => luby(self.restart_inc, restarts as u32),
            RestartKind::Geometric => self.restart_inc.powi(restarts as i32),
            RestartKind::Never => return None,
        };

        Some((restart_base * self.restart_init as f64) as usize)
    }
}
