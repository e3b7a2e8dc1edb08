use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{AppSettings, Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use itertools::Itertools;
use log::info;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use serde_with::serde_as;
use serde_with::DurationSecondsWithFrac;

use sat_forge_cdcl::lbool::LBool;
use sat_forge_cdcl::lit::Lit;
use sat_forge_cdcl::options::{CcminMode, Options, PhaseSaving, RestartKind, DEFAULT_OPTIONS};
use sat_forge_cdcl::solver::{SolveResult, Solver};
use sat_forge_cdcl::stats::Statistics;
use sat_forge_core::cnf::Cnf;

const HEADING_HEURISTIC: &str = "HEURISTIC OPTIONS";
const HEADING_RESTART: &str = "RESTART OPTIONS";
const HEADING_REDUCE_DB: &str = "REDUCE-DB OPTIONS";
const HEADING_BUDGET: &str = "BUDGET OPTIONS";

#[derive(Debug, Copy, Clone, ValueEnum)]
enum CcminArg {
    None,
    Shallow,
    Deep,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum PhaseSavingArg {
    None,
    Limited,
    Full,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum RestartArg {
    Luby,
    Geometric,
    Never,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "CDCL SAT solver for DIMACS CNF")]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
struct Cli {
    /// Path to input CNF (plain or gzipped).
    #[clap(value_name = "PATH")]
    input: PathBuf,

    /// Path to output results (JSON).
    #[clap(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the model as a `v ... 0` line.
    #[clap(long)]
    model: bool,

    /// Variable activity decay factor.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.var_decay)]
    var_decay: f64,

    /// Clause activity decay factor.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.clause_decay)]
    cla_decay: f64,

    /// Frequency with which the decision heuristic tries to choose a random variable.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.random_var_freq)]
    rnd_freq: f64,

    /// Seed for the random variable selection.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.random_seed)]
    rnd_seed: u64,

    /// Conflict clause minimization.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_enum, value_name = "MODE", default_value = "deep")]
    ccmin_mode: CcminArg,

    /// Phase saving level.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_enum, value_name = "MODE", default_value = "full")]
    phase_saving: PhaseSavingArg,

    /// Randomize the initial activity.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_name = "BOOL")]
    #[clap(action = clap::ArgAction::Set)]
    #[clap(default_value_t = DEFAULT_OPTIONS.rnd_init_act)]
    rnd_init: bool,

    /// Randomize the polarity of decisions.
    #[clap(help_heading = HEADING_HEURISTIC)]
    #[clap(long, value_name = "BOOL")]
    #[clap(action = clap::ArgAction::Set)]
    #[clap(default_value_t = DEFAULT_OPTIONS.rnd_pol)]
    rnd_pol: bool,

    /// Restart strategy.
    #[clap(help_heading = HEADING_RESTART)]
    #[clap(long, value_enum, value_name = "KIND", default_value = "luby")]
    restart: RestartArg,

    /// Base number of conflicts between restarts.
    #[clap(help_heading = HEADING_RESTART)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.restart_init)]
    restart_init: usize,

    /// Increment value for the number of conflicts between restarts.
    #[clap(help_heading = HEADING_RESTART)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.restart_inc)]
    restart_inc: f64,

    /// Reduce the learnt clause database.
    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "BOOL")]
    #[clap(action = clap::ArgAction::Set)]
    #[clap(default_value_t = DEFAULT_OPTIONS.reduce_db)]
    reduce_db: bool,

    /// Remove satisfied problem clauses during simplification.
    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "BOOL")]
    #[clap(action = clap::ArgAction::Set)]
    #[clap(default_value_t = DEFAULT_OPTIONS.remove_satisfied)]
    remove_satisfied: bool,

    /// Fraction of wasted arena memory allowed before a garbage collection.
    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.garbage_frac)]
    gc_frac: f64,

    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.min_learnts_lim)]
    min_learnts: usize,

    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.learntsize_factor)]
    learntsize_factor: f64,

    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.learntsize_inc)]
    learntsize_inc: f64,

    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.learntsize_adjust_start)]
    learntsize_adjust_start: f64,

    #[clap(help_heading = HEADING_REDUCE_DB)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.learntsize_adjust_inc)]
    learntsize_adjust_inc: f64,

    /// Stop after this many conflicts.
    #[clap(help_heading = HEADING_BUDGET)]
    #[clap(long, value_name = "NUM")]
    conflicts: Option<u64>,

    /// Stop after this many propagations.
    #[clap(help_heading = HEADING_BUDGET)]
    #[clap(long, value_name = "NUM")]
    propagations: Option<u64>,

    /// Stop after this many seconds.
    #[clap(help_heading = HEADING_BUDGET)]
    #[clap(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// Limit the clause arena to this many 32-bit words.
    #[clap(help_heading = HEADING_BUDGET)]
    #[clap(long, value_name = "WORDS")]
    arena_limit: Option<usize>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            var_decay: self.var_decay,
            clause_decay: self.cla_decay,
            random_var_freq: self.rnd_freq,
            random_seed: self.rnd_seed,
            ccmin_mode: match self.ccmin_mode {
                CcminArg::None => CcminMode::None,
                CcminArg::Shallow => CcminMode::Shallow,
                CcminArg::Deep => CcminMode::Deep,
            },
            phase_saving: match self.phase_saving {
                PhaseSavingArg::None => PhaseSaving::None,
                PhaseSavingArg::Limited => PhaseSaving::Limited,
                PhaseSavingArg::Full => PhaseSaving::Full,
            },
            rnd_init_act: self.rnd_init,
            rnd_pol: self.rnd_pol,
            restart: match self.restart {
                RestartArg::Luby => RestartKind::Luby,
                RestartArg::Geometric => RestartKind::Geometric,
                RestartArg::Never => RestartKind::Never,
            },
            restart_init: self.restart_init,
            restart_inc: self.restart_inc,
            garbage_frac: self.gc_frac,
            min_learnts_lim: self.min_learnts,
            learntsize_factor: self.learntsize_factor,
            learntsize_inc: self.learntsize_inc,
            learntsize_adjust_start: self.learntsize_adjust_start,
            learntsize_adjust_inc: self.learntsize_adjust_inc,
            remove_satisfied: self.remove_satisfied,
            reduce_db: self.reduce_db,
        }
    }
}

#[serde_as]
#[derive(Debug, Serialize)]
struct TheResult {
    name: String,
    result: String,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_total: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_search: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_propagate: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_analyze: Duration,
    num_vars: usize,
    num_clauses: usize,
    num_learnts: usize,
    num_decisions: u64,
    num_propagations: u64,
    num_conflicts: u64,
    num_restarts: u64,
    num_reduces: u64,
    num_garbage_collections: u64,
    arena_peak_words: usize,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("cli = {:?}", cli);

    // Setup the solver:
    let time_start = Instant::now();
    let mut solver = Solver::try_new(cli.options())?;
    if let Some(limit) = cli.arena_limit {
        solver = solver.with_arena_limit(limit);
    }
    let cnf = Cnf::from_file(&cli.input).wrap_err("Could not load the CNF")?;
    info!("cnf: {} vars, {} clauses", cnf.max_var, cnf.len());
    load_cnf(&mut solver, &cnf)?;
    let time_create = time_start.elapsed();

    if let Some(x) = cli.conflicts {
        solver.set_conflict_budget(x);
    }
    if let Some(x) = cli.propagations {
        solver.set_propagation_budget(x);
    }
    if let Some(x) = cli.timeout {
        solver.set_time_budget(Duration::from_secs_f64(x));
    }

    // Solve:
    let result = solver.solve()?;
    let time_total = time_start.elapsed();
    let stats = solver.stats();

    let the_result = TheResult {
        name: cli
            .input
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        result: result.to_string(),
        time_total,
        time_search: stats.time_search,
        time_propagate: stats.time_propagate,
        time_analyze: stats.time_analyze,
        num_vars: solver.num_vars(),
        num_clauses: solver.num_clauses(),
        num_learnts: solver.num_learnts(),
        num_decisions: stats.decisions,
        num_propagations: stats.propagations,
        num_conflicts: stats.conflicts,
        num_restarts: stats.restarts,
        num_reduces: stats.reduces,
        num_garbage_collections: stats.garbage_collections,
        arena_peak_words: stats.arena_peak_words,
    };

    // Dump the result:
    if let Some(output) = &cli.output {
        info!("Writing result to '{}'...", output.display());
        serde_json::to_writer_pretty(File::create(output)?, &the_result)?;
    }

    print_stats(&solver, &stats, time_total, time_create);

    println!(
        "s {}",
        match result {
            SolveResult::Sat => "SATISFIABLE",
            SolveResult::Unsat => "UNSATISFIABLE",
            SolveResult::Unknown => "UNKNOWN",
        }
    );
    if cli.model && result == SolveResult::Sat {
        let model = (0..solver.num_vars() as u32)
            .map(|v| {
                let lit = Lit::from_external(v as i32 + 1);
                if solver.model_value(lit) == LBool::False {
                    -lit
                } else {
                    lit
                }
            })
            .join(" ");
        println!("v {} 0", model);
    }

    std::process::exit(match result {
        SolveResult::Sat => 10,
        SolveResult::Unsat => 20,
        SolveResult::Unknown => 0,
    });
}

fn load_cnf(solver: &mut Solver, cnf: &Cnf) -> color_eyre::Result<()> {
    while solver.num_vars() < cnf.max_var {
        solver.new_var();
    }
    for clause in cnf.iter() {
        let lits = clause.iter().map(|lit| Lit::from_external(lit.get())).collect_vec();
        if !solver.add_clause(&lits)? {
            info!("Trivially UNSAT after adding {}", clause);
            break;
        }
    }
    Ok(())
}

fn print_stats(solver: &Solver, stats: &Statistics, time_total: Duration, time_create: Duration) {
    let format = &Locale::en;
    let percent = |t: Duration| 100.0 * t.as_secs_f64() / time_total.as_secs_f64().max(f64::EPSILON);
    println!("c vars:         {}", solver.num_vars().to_formatted_string(format));
    println!("c clauses:      {}", solver.num_clauses().to_formatted_string(format));
    println!("c learnts:      {}", solver.num_learnts().to_formatted_string(format));
    println!(
        "c decisions:    {} ({} random)",
        stats.decisions.to_formatted_string(format),
        stats.rnd_decisions.to_formatted_string(format)
    );
    println!("c propagations: {}", stats.propagations.to_formatted_string(format));
    println!("c conflicts:    {}", stats.conflicts.to_formatted_string(format));
    println!("c restarts:     {}", stats.restarts.to_formatted_string(format));
    println!("c reduces:      {}", stats.reduces.to_formatted_string(format));
    println!("c gcs:          {}", stats.garbage_collections.to_formatted_string(format));
    println!(
        "c conflict literals: {} ({:.2}% deleted)",
        stats.tot_literals.to_formatted_string(format),
        stats.minimized_percent()
    );
    println!(
        "c arena words:  {} (peak {})",
        stats.arena_words.to_formatted_string(format),
        stats.arena_peak_words.to_formatted_string(format)
    );
    println!("c time total:      {:?}", time_total);
    println!("c time create:     {:?} ({:.2}%)", time_create, percent(time_create));
    println!("c time search:     {:?} ({:.2}%)", stats.time_search, percent(stats.time_search));
    println!("c time propagate:  {:?} ({:.2}%)", stats.time_propagate, percent(stats.time_propagate));
    println!("c time analyze:    {:?} ({:.2}%)", stats.time_analyze, percent(stats.time_analyze));
    println!("c time reduce:     {:?} ({:.2}%)", stats.time_reduce, percent(stats.time_reduce));
    println!("c time gc:         {:?} ({:.2}%)", stats.time_gc, percent(stats.time_gc));
}
