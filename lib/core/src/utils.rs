use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use log::info;

use crate::cnf::Cnf;
use crate::solver::Solver;

pub fn get_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(OsStr::to_str)
}

/// Open the file for buffered reading, decompressing it on the fly if it ends in `.gz`.
pub fn read_maybe_gzip<P>(path: P) -> io::Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)?;
    let capacity = 128 * 1024;
    if get_extension(path) == Some("gz") {
        Ok(Box::new(BufReader::with_capacity(capacity, GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::with_capacity(capacity, file)))
    }
}

pub fn bootstrap_solver_from_cnf(solver: &mut impl Solver, cnf: &Cnf) {
    if cnf.max_var > solver.num_vars() {
        info!("Adding {} variables...", cnf.max_var - solver.num_vars());
        for _ in solver.num_vars()..cnf.max_var {
            solver.new_var();
        }
    }

    info!("Adding {} clauses...", cnf.clauses.len());
    for clause in cnf.clauses.iter() {
        solver.add_clause(&clause.lits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension(Path::new("a/b.cnf.gz")), Some("gz"));
        assert_eq!(get_extension(Path::new("a/b.cnf")), Some("cnf"));
        assert_eq!(get_extension(Path::new("a/b")), None);
    }
}
