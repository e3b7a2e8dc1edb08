pub mod cnf;
pub mod lit;
pub mod solver;
pub mod utils;
