use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use sat_forge::cdcl::{CcminMode, Lit, Options, Solver, DEFAULT_OPTIONS};
use sat_forge::core::cnf::Cnf;
use sat_forge_test_utils::{pigeonhole, random_k_sat};

fn solve(options: &Options, cnf: &Cnf) {
    let mut solver = Solver::new(options.clone());
    while solver.num_vars() < cnf.max_var {
        solver.new_var();
    }
    for clause in cnf.iter() {
        let lits: Vec<Lit> = clause.iter().map(|lit| Lit::from_external(lit.get())).collect();
        solver.add_clause(&lits).unwrap();
    }
    solver.solve().unwrap();
}

fn my_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("Solver");
    group.sample_size(10);

    for n in [6, 7] {
        let cnf = pigeonhole(n);
        group.bench_with_input(BenchmarkId::new("pigeonhole", n), &cnf, |b, cnf| {
            b.iter(|| solve(&DEFAULT_OPTIONS, cnf))
        });
    }

    let cnf = random_k_sat(150, 639, 3, 42);
    for mode in [CcminMode::None, CcminMode::Shallow, CcminMode::Deep] {
        let options = Options {
            ccmin_mode: mode,
            ..DEFAULT_OPTIONS
        };
        group.bench_with_input(BenchmarkId::new("random-3sat-150", format!("{:?}", mode)), &cnf, |b, cnf| {
            b.iter(|| solve(&options, cnf))
        });
    }

    group.finish();
}

criterion_group!(benches, my_benches);
criterion_main!(benches);
