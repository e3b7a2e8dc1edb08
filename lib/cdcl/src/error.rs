use snafu::Snafu;

pub type Result<T, E = SolverError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SolverError {
    /// The clause arena could not grow.
    ///
    /// This is fatal: the solver must not be used for further solving.
    #[snafu(display("Clause arena is out of memory: requested {} words, limit is {} words", requested, limit))]
    OutOfMemory { requested: usize, limit: usize },

    #[snafu(display("Invalid value for option '{}': {}", name, reason))]
    InvalidOption { name: &'static str, reason: String },
}
