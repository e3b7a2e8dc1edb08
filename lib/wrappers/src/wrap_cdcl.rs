use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};

use itertools::Itertools;
use tap::Pipe;

use sat_forge_cdcl::lbool::LBool;
use sat_forge_cdcl::lit::Lit as CdclLit;
use sat_forge_cdcl::options::Options;
use sat_forge_cdcl::solver::{SolveResult, Solver as Cdcl};
use sat_forge_core::lit::Lit;
use sat_forge_core::solver::{LitValue, SolveResponse, Solver};

/// The CDCL engine behind the solver-agnostic [`Solver`] trait.
///
/// Engine errors (out of memory) are fatal here: the trait has no error channel,
/// so they abort with a panic.
pub struct CdclSolver {
    inner: Cdcl,
    assumptions: Vec<CdclLit>,
}

impl CdclSolver {
    pub fn new() -> Self {
        Self::new_custom(Cdcl::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self::new_custom(Cdcl::new(options))
    }

    pub fn new_custom(inner: Cdcl) -> Self {
        Self {
            inner,
            assumptions: Vec::new(),
        }
    }

    pub fn inner(&self) -> &Cdcl {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut Cdcl {
        &mut self.inner
    }

    fn ensure_var(&mut self, lit: CdclLit) {
        while self.inner.num_vars() <= lit.var().index() {
            self.inner.new_var();
        }
    }
}

impl Default for CdclSolver {
    fn default() -> Self {
        CdclSolver::new()
    }
}

impl From<Cdcl> for CdclSolver {
    fn from(inner: Cdcl) -> Self {
        CdclSolver::new_custom(inner)
    }
}

impl Debug for CdclSolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdclSolver")
            .field("inner", &self.inner)
            .field("assumptions", &self.assumptions)
            .finish()
    }
}

impl Display for CdclSolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", tynm::type_name::<Self>(), self.inner)
    }
}

impl Solver for CdclSolver {
    fn signature(&self) -> Cow<str> {
        concat!("sat-forge-cdcl ", env!("CARGO_PKG_VERSION")).into()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.assumptions.clear();
    }

    fn num_vars(&self) -> usize {
        self.inner.num_vars()
    }
    fn num_clauses(&self) -> usize {
        self.inner.num_clauses()
    }

    fn new_var(&mut self) -> Lit {
        let var = self.inner.new_var();
        from_cdcl(CdclLit::positive(var))
    }

    fn assume<L>(&mut self, lit: L)
    where
        L: Into<Lit>,
    {
        let lit = lit.into().pipe(to_cdcl);
        self.ensure_var(lit);
        self.assumptions.push(lit);
    }

    fn add_clause<I>(&mut self, lits: I)
    where
        I: IntoIterator,
        I::Item: Into<Lit>,
    {
        let lits = lits.into_iter().map_into::<Lit>().map(to_cdcl).collect_vec();
        for &lit in lits.iter() {
            self.ensure_var(lit);
        }
        if let Err(e) = self.inner.add_clause(&lits) {
            panic!("add_clause failed: {}", e);
        }
    }

    fn solve(&mut self) -> SolveResponse {
        let assumptions = std::mem::take(&mut self.assumptions);
        match self.inner.solve_under_assumptions(&assumptions) {
            Ok(SolveResult::Sat) => SolveResponse::Sat,
            Ok(SolveResult::Unsat) => SolveResponse::Unsat,
            Ok(SolveResult::Unknown) => SolveResponse::Unknown,
            Err(e) => panic!("solve failed: {}", e),
        }
    }

    fn value<L>(&self, lit: L) -> LitValue
    where
        L: Into<Lit>,
    {
        match self.inner.model_value(lit.into().pipe(to_cdcl)) {
            LBool::True => LitValue::True,
            LBool::False => LitValue::False,
            LBool::Undef => LitValue::DontCare,
        }
    }

    fn failed<L>(&self, lit: L) -> bool
    where
        L: Into<Lit>,
    {
        self.inner.failed(lit.into().pipe(to_cdcl))
    }
}

fn to_cdcl(lit: Lit) -> CdclLit {
    CdclLit::from_external(lit.get())
}

fn from_cdcl(lit: CdclLit) -> Lit {
    Lit::from(lit.to_external())
}
