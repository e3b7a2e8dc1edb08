use std::io::Read;
use std::path::{Path, PathBuf};

use dimacs::{parse_dimacs, Instance, Sign};
use log::debug;
use snafu::{ResultExt, Snafu};

use crate::cnf::{Clause, Cnf};
use crate::lit::Lit;
use crate::utils::read_maybe_gzip;

#[derive(Debug, Snafu)]
pub enum CnfError {
    #[snafu(display("Could not read '{}': {}", path.display(), source))]
    Io { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not parse DIMACS: {}", reason))]
    Parse { reason: String },

    #[snafu(display("Expected a CNF instance, found a SAT formula"))]
    NotCnf,
}

pub(crate) fn parse_cnf_file(path: &Path) -> Result<Cnf, CnfError> {
    debug!("Reading CNF from '{}'", path.display());
    let mut input = String::new();
    read_maybe_gzip(path)
        .and_then(|mut reader| reader.read_to_string(&mut input))
        .context(IoSnafu { path })?;
    parse_cnf_str(&input)
}

pub(crate) fn parse_cnf_str(input: &str) -> Result<Cnf, CnfError> {
    let instance = parse_dimacs(input).map_err(|e| CnfError::Parse {
        reason: format!("{:?}", e),
    })?;
    match instance {
        Instance::Cnf { num_vars, clauses } => {
            let mut cnf = Cnf::new();
            cnf.max_var = num_vars as usize;
            for c in clauses.iter() {
                let lits = c.lits().iter().map(|x| {
                    let v = x.var().to_u64() as i32;
                    match x.sign() {
                        Sign::Pos => Lit::new(v),
                        Sign::Neg => Lit::new(-v),
                    }
                });
                cnf.add_clause(Clause::from(lits));
            }
            Ok(cnf)
        }
        _ => NotCnfSnafu.fail(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use color_eyre::eyre::Result;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    const SAMPLE: &str = "c sample\np cnf 4 3\n1 -2 0\n2 3 -4 0\n-1 0\n";

    #[test]
    fn test_parse_str() -> Result<()> {
        let cnf = parse_cnf_str(SAMPLE)?;
        assert_eq!(cnf.max_var, 4);
        assert_eq!(cnf.clauses.len(), 3);
        assert_eq!(cnf.clauses[1], Clause::from([2, 3, -4]));
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_cnf_str("p cnf x y\n"), Err(CnfError::Parse { .. })));
        let err = parse_cnf_file(Path::new("/definitely/not/here.cnf")).unwrap_err();
        assert!(matches!(err, CnfError::Io { .. }));
        assert!(err.to_string().contains("here.cnf"));
    }

    #[test]
    fn test_parse_gzip_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("sat-forge-core-{}.cnf.gz", std::process::id()));
        let mut encoder = GzEncoder::new(std::fs::File::create(&path)?, Compression::default());
        encoder.write_all(SAMPLE.as_bytes())?;
        encoder.finish()?;

        let cnf = parse_cnf_file(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(cnf, parse_cnf_str(SAMPLE)?);
        Ok(())
    }
}
