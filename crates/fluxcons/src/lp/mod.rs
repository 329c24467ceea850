//! Linear programs and the solver seam.
//!
//! Purpose
//! - `LinearProgram`: a sparse LP in the canonical form used by every probe
//!   (`A x (sense) b`, `lb <= x <= ub`, linear objective, direction).
//! - `LpSolver`: the only place where numerical optimization happens. The
//!   consistency code never looks inside a solve; it only reads the status and
//!   the primal vector, and threads an opaque warm-start basis along.
//!
//! Layout
//! - `build.rs`: `build_lp` (Model → LinearProgram) and column/row extension.
//! - `backend.rs`: `MicroLp`, the bundled pure-Rust simplex backend.

mod backend;
mod build;

pub use backend::MicroLp;
pub use build::{build_lp, ExtraRow};

use nalgebra::DVector;
use sprs::CsMat;

use crate::model::Sense;

/// Optimization direction of the objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Terminal status of a single solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The backend gave up for numerical or internal reasons.
    Failed,
}

/// Result of one `LpSolver::solve` call.
#[derive(Clone, Debug)]
pub struct LpOutcome<B> {
    pub status: LpStatus,
    /// Primal vector, present iff `status == Optimal`.
    pub x: Option<DVector<f64>>,
    pub basis: Option<B>,
}

impl<B> LpOutcome<B> {
    pub fn failed(status: LpStatus) -> Self {
        Self {
            status,
            x: None,
            basis: None,
        }
    }
}

/// Opaque LP backend.
///
/// Implementations must be correct with or without a basis: a `None` basis
/// means cold start, and a returned basis is only a hint for the next call.
pub trait LpSolver {
    type Basis: Clone + std::fmt::Debug;

    /// Smallest magnitude the backend can reliably distinguish from zero.
    fn feasibility_tolerance(&self) -> f64;

    fn solve(&self, lp: &LinearProgram, basis: Option<Self::Basis>) -> LpOutcome<Self::Basis>;
}

/// Outcome of a cardinality or feasibility probe over the working LP.
///
/// `flux` holds only the original flux variables (auxiliary columns dropped).
#[derive(Clone, Debug)]
pub struct Probe<B> {
    pub status: LpStatus,
    pub flux: Option<DVector<f64>>,
    pub basis: Option<B>,
}

impl<B> Probe<B> {
    pub(crate) fn from_outcome(outcome: LpOutcome<B>, n_flux: usize) -> Self {
        let flux = outcome
            .x
            .map(|x| DVector::from_iterator(n_flux, x.iter().take(n_flux).copied()));
        Self {
            status: outcome.status,
            flux,
            basis: outcome.basis,
        }
    }
}

/// Sparse LP: `A x (sense) b`, `lb <= x <= ub`, optimize `c · x`.
///
/// `a` is stored column-major (CSC) so that column flips and column
/// extensions stay cheap.
#[derive(Clone, Debug)]
pub struct LinearProgram {
    pub a: CsMat<f64>,
    pub b: Vec<f64>,
    pub sense: Vec<Sense>,
    pub lb: Vec<f64>,
    pub ub: Vec<f64>,
    pub c: Vec<f64>,
    pub direction: Direction,
}

impl LinearProgram {
    #[inline]
    pub fn n_vars(&self) -> usize {
        self.a.cols()
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.a.rows()
    }

    /// Replace the objective in place.
    pub fn set_objective(&mut self, c: Vec<f64>, direction: Direction) {
        debug_assert_eq!(c.len(), self.n_vars(), "objective length mismatch");
        self.c = c;
        self.direction = direction;
    }

    /// Copy of this program with a different objective.
    pub fn with_objective(&self, c: Vec<f64>, direction: Direction) -> Self {
        let mut lp = self.clone();
        lp.set_objective(c, direction);
        lp
    }

    /// Copy with every infinite bound replaced by `-cap` / `cap`.
    pub fn boxed(&self, cap: f64) -> Self {
        let mut lp = self.clone();
        for lo in lp.lb.iter_mut().filter(|lo| lo.is_infinite()) {
            *lo = -cap;
        }
        for hi in lp.ub.iter_mut().filter(|hi| hi.is_infinite()) {
            *hi = cap;
        }
        lp
    }

    /// Nonzeros grouped by row: `rows[i] = [(col, coeff), ...]`.
    pub fn row_entries(&self) -> Vec<Vec<(usize, f64)>> {
        crate::model::row_entries(&self.a)
    }

    /// Row activities `A x` for a vector over the first `n_vars` columns.
    pub fn activity(&self, x: &DVector<f64>) -> Vec<f64> {
        let mut out = vec![0.0; self.n_rows()];
        for (i, j, v) in crate::model::entries(&self.a) {
            out[i] += v * x[j];
        }
        out
    }

    /// Euclidean norm of the per-row constraint violations of `x`.
    pub fn residual(&self, x: &DVector<f64>) -> f64 {
        self.activity(x)
            .iter()
            .zip(self.b.iter().zip(&self.sense))
            .map(|(&ax, (&b, sense))| sense.violation(ax, b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Largest amount by which `x` leaves the variable box.
    pub fn bound_violation(&self, x: &DVector<f64>) -> f64 {
        x.iter()
            .zip(self.lb.iter().zip(&self.ub))
            .map(|(&v, (&lo, &hi))| (lo - v).max(v - hi).max(0.0))
            .fold(0.0, f64::max)
    }
}
