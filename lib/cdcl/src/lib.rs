pub mod solver;

pub mod assignment;
pub mod budget;
pub mod clause;
pub mod clause_allocator;
pub mod clause_database;
pub mod cref;
pub mod error;
pub mod idx;
pub mod lbool;
pub mod learning;
pub mod lit;
pub mod options;
pub mod restart;
pub mod stats;
pub mod utils;
pub mod var;
pub mod var_order;
pub mod watch;

pub use budget::Interrupt;
pub use error::SolverError;
pub use lbool::LBool;
pub use lit::Lit;
pub use options::{CcminMode, Options, PhaseSaving, RestartKind, DEFAULT_OPTIONS};
pub use solver::{SolveResult, Solver};
pub use stats::Statistics;
pub use var::Var;
