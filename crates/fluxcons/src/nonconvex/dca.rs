//! DCA cardinality maximizer.
//!
//! Maximize `|{ j ∈ J : |v_j| >= ε }|` over the working LP. With auxiliaries
//! `t_j >= max(1, |v_j|/ε)` the saturating count is
//! `Σ_J min(|v_j|/ε, 1) = Σ_J |v_j|/ε − Σ_J (t_j − 1)` at the optimum of `t`,
//! a difference of convex functions. Each round linearizes the concave part at
//! the current point (`v̄_j = ρ_j sign(v_j)/ε`) and solves
//!
//! ```text
//! min  Σ_J t_j − v̄ · v
//! s.t. working rows on v,  ±v_j/ε − t_j <= 0,  1 <= t_j <= max(1, |lb_j|/ε, |ub_j|/ε)
//! ```
//!
//! Infinite bounds are boxed to `±FREE_BOUND_BOX` first. Supports that need
//! larger fluxes are left to the exact singleton fallback.
//!
//! Stops after `DCA_MAX_ROUNDS` rounds, or as soon as either the step
//! `‖v_new − v_old‖` or the score change drops below ε.

use nalgebra::DVector;

use super::score::score;
use crate::cfg::{DCA_MAX_ROUNDS, FREE_BOUND_BOX};
use crate::lp::{Direction, ExtraRow, LinearProgram, LpSolver, LpStatus, Probe};
use crate::model::Sense;

/// Run the DCA over `candidates` (non-empty) in the working program `lp`.
///
/// Returns the last iterate restricted to the flux columns, or the failing
/// status (no vector) if any round is infeasible, unbounded or failed.
pub fn maximize_cardinality<S: LpSolver>(
    solver: &S,
    candidates: &[usize],
    lp: &LinearProgram,
    epsilon: f64,
    basis: Option<S::Basis>,
) -> Probe<S::Basis> {
    debug_assert!(!candidates.is_empty(), "DCA needs at least one candidate");
    let lp = &lp.boxed(FREE_BOUND_BOX);
    let n = lp.n_vars();
    let k = candidates.len();

    let mut v = DVector::zeros(n);
    let mut rho = DVector::zeros(n);
    for &j in candidates {
        v[j] = 1.0;
        rho[j] = 1.0;
    }

    let t_lb = vec![1.0; k];
    let t_ub: Vec<f64> = candidates
        .iter()
        .map(|&j| 1.0f64.max(lp.lb[j].abs() / epsilon).max(lp.ub[j].abs() / epsilon))
        .collect();
    let mut rows = Vec::with_capacity(2 * k);
    for (a, &j) in candidates.iter().enumerate() {
        for s in [1.0, -1.0] {
            rows.push(ExtraRow {
                coeffs: vec![(j, s / epsilon), (n + a, -1.0)],
                sense: Sense::Le,
                rhs: 0.0,
            });
        }
    }
    let mut aux = lp.extended(&t_lb, &t_ub, &rows);

    let mut basis = basis;
    let mut score_old = score(&v, &rho, candidates, epsilon);
    for round in 0..DCA_MAX_ROUNDS {
        let mut c = vec![0.0; n + k];
        for (a, &j) in candidates.iter().enumerate() {
            c[n + a] = 1.0;
            c[j] = -rho[j] * sign(v[j]) / epsilon;
        }
        aux.set_objective(c, Direction::Minimize);

        let outcome = solver.solve(&aux, basis.take());
        let x = match (outcome.status, outcome.x) {
            (LpStatus::Optimal, Some(x)) => x,
            (status, _) => {
                tracing::debug!(round, ?status, candidates = k, "dca round failed");
                let status = if status == LpStatus::Optimal {
                    LpStatus::Failed
                } else {
                    status
                };
                return Probe {
                    status,
                    flux: None,
                    basis: outcome.basis,
                };
            }
        };
        basis = outcome.basis;

        let v_new = DVector::from_iterator(n, x.iter().take(n).copied());
        let dv = (&v_new - &v).norm();
        let score_new = score(&v_new, &rho, candidates, epsilon);
        let dscore = (score_new - score_old).abs();
        v = v_new;
        score_old = score_new;
        tracing::trace!(round, dv, score = score_new, dscore, "dca round");
        if dv < epsilon || dscore < epsilon {
            break;
        }
    }

    Probe {
        status: LpStatus::Optimal,
        flux: Some(v),
        basis,
    }
}

/// Sign with `sign(0) = 0` (unlike `f64::signum`).
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
