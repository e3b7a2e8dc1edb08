use std::fs;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use sat_forge::core::cnf::Cnf;
use sat_forge::core::lit::Lit;
use sat_forge::core::solver::{LitValue, SolveResponse, Solver, SolverExt};
use sat_forge::core::utils::bootstrap_solver_from_cnf;
use sat_forge::wrappers::cdcl::CdclSolver;
use sat_forge_test_utils::{check_model, pigeonhole, run_test_1};

fn queens(n: usize) -> Cnf {
    let q = |r: usize, c: usize| (r * n + c + 1) as i32;
    let mut cnf = Cnf::new();
    for r in 0..n {
        cnf.add_clause((0..n).map(|c| q(r, c)));
    }
    for r1 in 0..n {
        for c1 in 0..n {
            for r2 in 0..n {
                for c2 in 0..n {
                    let (a, b) = (q(r1, c1), q(r2, c2));
                    let attacks = r1 == r2 || c1 == c2 || r1 + c2 == r2 + c1 || r1 + c1 == r2 + c2;
                    if a < b && attacks {
                        cnf.add_clause([-a, -b]);
                    }
                }
            }
        }
    }
    cnf.max_var = n * n;
    cnf
}

fn solve_cnf(cnf: &Cnf) -> (SolveResponse, CdclSolver) {
    let mut solver = CdclSolver::new();
    bootstrap_solver_from_cnf(&mut solver, cnf);
    let response = solver.solve();
    (response, solver)
}

fn bool_model(solver: &CdclSolver) -> Vec<bool> {
    solver.model().into_iter().map(|v| v.unwrap_or(false)).collect()
}

#[test]
fn test_run_test_1() -> color_eyre::Result<()> {
    run_test_1(CdclSolver::new())
}

#[test]
fn test_queens_through_dimacs_text() -> color_eyre::Result<()> {
    for (n, expected) in [(2, SolveResponse::Unsat), (3, SolveResponse::Unsat), (4, SolveResponse::Sat), (8, SolveResponse::Sat)] {
        let text = queens(n).to_string();
        let cnf = Cnf::from_dimacs(&text)?;
        assert_eq!(cnf, queens(n));
        let (response, solver) = solve_cnf(&cnf);
        assert_eq!(response, expected, "{} queens", n);
        if response == SolveResponse::Sat {
            let model = bool_model(&solver);
            assert!(check_model(&cnf, &model));
            assert_eq!(model.iter().filter(|&&x| x).count(), n);
        }
    }
    Ok(())
}

#[test]
fn test_gzipped_dimacs_file() -> color_eyre::Result<()> {
    let path = std::env::temp_dir().join(format!("sat-forge-php-{}.cnf.gz", std::process::id()));
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(pigeonhole(4).to_string().as_bytes())?;
    fs::write(&path, encoder.finish()?)?;

    let cnf = Cnf::from_file(&path);
    fs::remove_file(&path)?;
    let cnf = cnf?;
    assert_eq!(cnf, pigeonhole(4));

    let (response, solver) = solve_cnf(&cnf);
    assert_eq!(response, SolveResponse::Unsat);
    assert_eq!(response.exit_code(), 20);
    assert_eq!(solver.num_vars(), 20);
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let err = Cnf::from_file("/nonexistent/sat-forge/input.cnf").unwrap_err();
    assert!(err.to_string().contains("input.cnf"));
}

#[test]
fn test_assumptions_through_trait() {
    let mut solver = CdclSolver::new();
    let lits = solver.new_var_vec(3);
    let (a, b, c) = (lits[0], lits[1], lits[2]);
    solver.add_clause([-a, b]);
    solver.add_clause([-b, c]);

    solver.assume_all([a, -c]);
    assert_eq!(solver.solve(), SolveResponse::Unsat);
    assert!(solver.failed(a));
    assert!(solver.failed(-c));

    solver.assume(a);
    assert_eq!(solver.solve(), SolveResponse::Sat);
    assert_eq!(solver.value(c), LitValue::True);

    // Literals beyond the declared variables are created on demand.
    solver.add_clause([Lit::new(-7), Lit::new(8)]);
    assert_eq!(solver.num_vars(), 8);
    assert_eq!(solver.solve(), SolveResponse::Sat);
}
