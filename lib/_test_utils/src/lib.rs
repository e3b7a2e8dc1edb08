use std::fmt::Display;

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use sat_forge_core::cnf::Cnf;
use sat_forge_core::solver::*;

pub fn run_test_1<S>(mut solver: S) -> color_eyre::Result<()>
where
    S: Solver + Display,
{
    println!("Solver signature: {}", solver.signature());
    println!("solver = {}", solver);

    solver.add_clause([1, 2]);
    solver.add_clause(vec![3, 4]);
    solver.add_clause([-1, -2]);
    solver.add_clause(vec![-3, -4]);
    solver.add_unit(5);
    let response = solver.solve();
    println!("Solver returned: {:?}", response);
    assert!(matches!(response, SolveResponse::Sat));
    assert_eq!(solver.value(5), LitValue::True);
    assert_ne!(solver.value(1), solver.value(2));

    solver.assume(1);
    solver.assume(2);
    let response = solver.solve();
    println!("Solver returned: {:?}", response);
    assert!(matches!(response, SolveResponse::Unsat));

    let response = solver.solve();
    println!("Solver returned: {:?}", response);
    assert!(matches!(response, SolveResponse::Sat));

    for i in 1..=5 {
        println!("solver.val({}) = {:?}", i, solver.value(i));
    }

    Ok(())
}

/// Pigeonhole principle PHP(n+1, n): `n + 1` pigeons do not fit into `n` holes.
///
/// Variable `i * n + j + 1` means "pigeon `i` sits in hole `j`".
pub fn pigeonhole(n: usize) -> Cnf {
    let p = |i: usize, j: usize| (i * n + j + 1) as i32;
    let mut cnf = Cnf::new();
    for i in 0..=n {
        cnf.add_clause((0..n).map(|j| p(i, j)));
    }
    for j in 0..n {
        for a in 0..=n {
            for b in (a + 1)..=n {
                cnf.add_clause([-p(a, j), -p(b, j)]);
            }
        }
    }
    cnf.max_var = (n + 1) * n;
    cnf
}

/// Uniform random k-SAT: each clause has `k` distinct variables with random signs.
pub fn random_k_sat(num_vars: usize, num_clauses: usize, k: usize, seed: u64) -> Cnf {
    assert!(k <= num_vars, "k must not exceed the number of variables");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cnf = Cnf::new();
    for _ in 0..num_clauses {
        let vars = sample(&mut rng, num_vars, k);
        let clause: Vec<i32> = vars
            .iter()
            .map(|v| {
                let lit = (v + 1) as i32;
                if rng.gen() {
                    lit
                } else {
                    -lit
                }
            })
            .collect();
        cnf.add_clause(clause);
    }
    cnf.max_var = num_vars;
    cnf
}

/// Whether `model` (indexed by 0-based variable) satisfies every clause.
pub fn check_model(cnf: &Cnf, model: &[bool]) -> bool {
    cnf.iter().all(|clause| clause.is_satisfied_by(model))
}

/// Exhaustive search for a model; only for tiny formulas.
pub fn brute_force(cnf: &Cnf) -> Option<Vec<bool>> {
    let n = cnf.max_var;
    assert!(n <= 20, "brute force is limited to 20 variables");
    (0u32..1 << n).find_map(|bits| {
        let model: Vec<bool> = (0..n).map(|i| bits >> i & 1 == 1).collect();
        check_model(cnf, &model).then(|| model)
    })
}
